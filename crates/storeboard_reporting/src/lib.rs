pub mod adapter;
pub mod aggregator;
pub mod aliases;
pub mod bucket;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod source;
pub mod summary;

pub use adapter::{AnalyticsAdapter, UNKNOWN_PERIOD};
pub use aggregator::FallbackAggregator;
pub use error::FallbackReason;
pub use feed::{ChartFeed, RequestTicket, RequestTracker};
pub use pipeline::{
    PipelineOutcome, ReportingConfig, SalesSeries, SeriesReport, SeriesRequest, SeriesSource,
};
pub use source::ReportingSource;
pub use summary::SeriesSummary;
