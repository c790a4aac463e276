use crate::adapter::AnalyticsAdapter;
use crate::aggregator::FallbackAggregator;
use crate::error::FallbackReason;
use crate::source::ReportingSource;
use crate::summary::SeriesSummary;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use std::time::Duration;
use storeboard_shared_models::{
    DateRange, Granularity, MetricType, ReportPeriod, TimeSeriesPoint, WeekStart,
};
use tokio::time::timeout;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub orders_page_size: u32,
    pub orders_max_pages: u32,
    pub week_start: WeekStart,
    /// Offset used to turn order instants into calendar dates.
    pub utc_offset: FixedOffset,
    pub stage_timeout: Duration,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            orders_page_size: 1000,
            orders_max_pages: 1,
            week_start: WeekStart::Sunday,
            utc_offset: Utc.fix(),
            stage_timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesRequest {
    pub period: ReportPeriod,
    pub range: DateRange,
}

impl SeriesRequest {
    pub fn new(period: ReportPeriod, range: DateRange) -> Self {
        Self { period, range }
    }

    /// Request covering the period's lookback window ending at `now`.
    pub fn lookback(period: ReportPeriod, now: DateTime<Utc>) -> Self {
        Self {
            period,
            range: period.lookback(now),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.period.granularity()
    }
}

/// Which stage produced a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    Analytics,
    ClientAggregation,
    /// Both stages failed, the series is empty.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesReport {
    pub request: SeriesRequest,
    pub source: SeriesSource,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesReport {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(label, value)` pairs for the plotted metric.
    pub fn values(&self, metric: MetricType) -> Vec<(String, f64)> {
        self.points
            .iter()
            .map(|p| (p.period.clone(), metric.value(p)))
            .collect()
    }

    pub fn summary(&self, metric: MetricType) -> SeriesSummary {
        SeriesSummary::from_points(&self.points, metric)
    }
}

/// Result of one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Ready(Vec<TimeSeriesPoint>),
    NeedsFallback(FallbackReason),
    Failed(String),
}

/// Produces sales series: server-side analytics first, client-side
/// aggregation of raw orders when that is unavailable or unusable.
pub struct SalesSeries<S> {
    source: S,
    config: ReportingConfig,
}

impl<S: ReportingSource> SalesSeries<S> {
    pub fn new(source: S, config: ReportingConfig) -> Self {
        Self { source, config }
    }

    /// Never fails: a request that cannot be served yields an empty series
    /// marked [`SeriesSource::Unavailable`].
    pub async fn fetch(&self, request: &SeriesRequest) -> SeriesReport {
        let (source, outcome) = match self.remote_stage(request).await {
            PipelineOutcome::NeedsFallback(reason) => {
                info!(period = %request.period, %reason, "falling back to client-side aggregation");
                (SeriesSource::ClientAggregation, self.fallback_stage(request).await)
            }
            outcome => (SeriesSource::Analytics, outcome),
        };

        match outcome {
            PipelineOutcome::Ready(points) => SeriesReport {
                request: *request,
                source,
                points,
            },
            PipelineOutcome::NeedsFallback(reason) => self.unavailable(request, &reason.to_string()),
            PipelineOutcome::Failed(reason) => self.unavailable(request, &reason),
        }
    }

    pub async fn remote_stage(&self, request: &SeriesRequest) -> PipelineOutcome {
        let granularity = request.granularity();
        let call = self.source.order_analytics(&request.range, granularity);

        let records = match timeout(self.config.stage_timeout, call).await {
            Err(_) => {
                return PipelineOutcome::NeedsFallback(FallbackReason::TimedOut(
                    self.config.stage_timeout,
                ));
            }
            Ok(Err(err)) => {
                return PipelineOutcome::NeedsFallback(FallbackReason::RemoteUnavailable(
                    err.to_string(),
                ));
            }
            Ok(Ok(records)) => records,
        };

        let adapter = AnalyticsAdapter::new(granularity, self.config.utc_offset);
        match adapter.normalize(&records) {
            Ok(points) => PipelineOutcome::Ready(points),
            Err(reason) => PipelineOutcome::NeedsFallback(reason),
        }
    }

    pub async fn fallback_stage(&self, request: &SeriesRequest) -> PipelineOutcome {
        let page_size = self.config.orders_page_size.max(1);
        let max_pages = self.config.orders_max_pages.max(1);

        let fetch_all = async {
            let mut orders = Vec::new();
            for page in 1..=max_pages {
                let batch = self.source.list_orders(page, page_size).await?;
                let short_page = batch.len() < page_size as usize;
                orders.extend(batch);
                if short_page {
                    break;
                }
            }
            Ok::<_, storeboard_api::ApiError>(orders)
        };

        let orders = match timeout(self.config.stage_timeout, fetch_all).await {
            Err(_) => {
                return PipelineOutcome::Failed(format!(
                    "order listing timed out after {:?}",
                    self.config.stage_timeout
                ));
            }
            Ok(Err(err)) => return PipelineOutcome::Failed(err.to_string()),
            Ok(Ok(orders)) => orders,
        };

        let aggregator = FallbackAggregator::new(
            request.granularity(),
            self.config.week_start,
            self.config.utc_offset,
        );
        PipelineOutcome::Ready(aggregator.aggregate(&orders, &request.range))
    }

    fn unavailable(&self, request: &SeriesRequest, reason: &str) -> SeriesReport {
        warn!(period = %request.period, reason, "sales series unavailable, rendering empty chart");
        SeriesReport {
            request: *request,
            source: SeriesSource::Unavailable,
            points: Vec::new(),
        }
    }
}
