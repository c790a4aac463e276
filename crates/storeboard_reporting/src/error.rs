use std::time::Duration;
use thiserror::Error;

/// Why the analytics stage handed over to client-side aggregation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FallbackReason {
    #[error("analytics endpoint unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("analytics request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("analytics endpoint returned {records} record(s) without usable period labels")]
    UnusableShape { records: usize },
}
