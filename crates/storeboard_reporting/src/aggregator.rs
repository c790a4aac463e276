use crate::aliases::{self, ORDER_AMOUNT_FIELDS, ORDER_CREATED_FIELDS};
use crate::bucket::{bucket_start, format_label};
use chrono::{FixedOffset, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;
use storeboard_shared_models::{DateRange, Granularity, TimeSeriesPoint, WeekStart};
use tracing::debug;

#[derive(Debug, Default)]
struct Bucket {
    revenue: f64,
    orders: u64,
}

/// Groups raw orders into day, week or month buckets on the client.
#[derive(Debug, Clone)]
pub struct FallbackAggregator {
    granularity: Granularity,
    week_start: WeekStart,
    offset: FixedOffset,
}

impl FallbackAggregator {
    pub fn new(granularity: Granularity, week_start: WeekStart, offset: FixedOffset) -> Self {
        Self {
            granularity,
            week_start,
            offset,
        }
    }

    /// Buckets every order created inside `range`. The result is ordered by
    /// bucket start date. Orders with an unusable amount still count.
    pub fn aggregate(&self, orders: &[Value], range: &DateRange) -> Vec<TimeSeriesPoint> {
        let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
        let mut undated = 0usize;
        let mut out_of_range = 0usize;

        for order in orders.iter().filter_map(Value::as_object) {
            let Some(created) = aliases::resolve(order, ORDER_CREATED_FIELDS, |value| {
                aliases::as_instant(value, &self.offset)
            }) else {
                undated += 1;
                continue;
            };

            if !range.contains(&created) {
                out_of_range += 1;
                continue;
            }

            let day = aliases::local_date(&created, &self.offset);
            let bucket = buckets
                .entry(bucket_start(day, self.granularity, self.week_start))
                .or_default();

            bucket.revenue += aliases::resolve(order, ORDER_AMOUNT_FIELDS, aliases::as_number)
                .filter(|amount| *amount >= 0.0)
                .unwrap_or(0.0);
            bucket.orders += 1;
        }

        debug!(
            orders = orders.len(),
            buckets = buckets.len(),
            undated,
            out_of_range,
            "aggregated orders"
        );

        buckets
            .into_iter()
            .map(|(start, bucket)| TimeSeriesPoint {
                period: format_label(start, self.granularity),
                revenue: bucket.revenue,
                orders: bucket.orders,
            })
            .collect()
    }
}
