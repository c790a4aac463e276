use crate::method::Method;
use crate::records::Records;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storeboard_shared_models::{DateRange, Granularity};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
pub struct OrderAnalyticsParams {
    #[serde(rename = "startDate")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<Utc>,
    #[serde(rename = "groupBy")]
    pub group_by: Granularity,
}

impl OrderAnalyticsParams {
    pub fn for_range(range: &DateRange, group_by: Granularity) -> Self {
        Self {
            start_date: range.start,
            end_date: range.end,
            group_by,
        }
    }
}

/// Server-side order aggregation. Record field names vary between backend
/// versions, so records are kept as raw JSON.
pub struct OrderAnalytics;

impl Method for OrderAnalytics {
    const PATH: &'static str = "/analytics/orders";

    type Response = Records;
    type Params = OrderAnalyticsParams;
}
