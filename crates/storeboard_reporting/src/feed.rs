use crate::pipeline::{SalesSeries, SeriesReport, SeriesRequest};
use crate::source::ReportingSource;
use std::sync::atomic::{AtomicU64, Ordering};
use storeboard_shared_models::MetricType;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Hands out request generations. Only the most recently issued ticket is
/// current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Latest series shown by a chart. Results of superseded requests are
/// discarded, so a slow old request cannot overwrite a newer one.
pub struct ChartFeed<S> {
    series: SalesSeries<S>,
    tracker: RequestTracker,
    latest: RwLock<Option<SeriesReport>>,
}

impl<S: ReportingSource> ChartFeed<S> {
    pub fn new(series: SalesSeries<S>) -> Self {
        Self {
            series,
            tracker: RequestTracker::new(),
            latest: RwLock::new(None),
        }
    }

    /// Fetches `request` and publishes it. Returns `None` when a newer
    /// refresh started while this one was in flight.
    pub async fn refresh(&self, request: SeriesRequest) -> Option<SeriesReport> {
        let ticket = self.tracker.begin();
        let report = self.series.fetch(&request).await;

        let mut latest = self.latest.write().await;
        if !self.tracker.is_current(&ticket) {
            debug!(
                generation = ticket.generation(),
                period = %request.period,
                "discarding superseded sales series"
            );
            return None;
        }

        *latest = Some(report.clone());
        Some(report)
    }

    pub async fn latest(&self) -> Option<SeriesReport> {
        self.latest.read().await.clone()
    }

    /// Switching metric reuses the published series.
    pub async fn values(&self, metric: MetricType) -> Vec<(String, f64)> {
        self.latest
            .read()
            .await
            .as_ref()
            .map(|report| report.values(metric))
            .unwrap_or_default()
    }
}
