use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("server responded with {status}: {body}")]
    Http { status: u16, body: String },
    #[error("error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),
}
