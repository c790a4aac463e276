use serde_json::Value;
use std::future::Future;
use storeboard_api::analytics::{OrderAnalytics, OrderAnalyticsParams};
use storeboard_api::orders::{ListOrders, ListOrdersParams};
use storeboard_api::{ApiError, StoreboardClient};
use storeboard_shared_models::{DateRange, Granularity};

/// Backend calls the sales series needs. Implemented by the HTTP client and
/// by in-memory fakes in tests.
pub trait ReportingSource {
    fn order_analytics(
        &self,
        range: &DateRange,
        granularity: Granularity,
    ) -> impl Future<Output = Result<Vec<Value>, ApiError>> + Send;

    fn list_orders(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<Value>, ApiError>> + Send;
}

impl ReportingSource for StoreboardClient {
    async fn order_analytics(
        &self,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<Vec<Value>, ApiError> {
        let records = self
            .call::<OrderAnalytics>(OrderAnalyticsParams::for_range(range, granularity))
            .await?;
        Ok(records.into_vec())
    }

    async fn list_orders(&self, page: u32, page_size: u32) -> Result<Vec<Value>, ApiError> {
        let records = self
            .call::<ListOrders>(ListOrdersParams::builder().page(page).page_size(page_size).build())
            .await?;
        Ok(records.into_vec())
    }
}
