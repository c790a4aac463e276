use chrono::FixedOffset;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use storeboard_api::ClientConfig;
use storeboard_reporting::ReportingConfig;
use storeboard_shared_models::WeekStart;
use thiserror::Error;

pub const API_URL: &str = "STOREBOARD_API_URL";
pub const API_TOKEN: &str = "STOREBOARD_API_TOKEN";
pub const TIMEOUT_SECS: &str = "STOREBOARD_TIMEOUT_SECS";
pub const ORDERS_PAGE_SIZE: &str = "STOREBOARD_ORDERS_PAGE_SIZE";
pub const ORDERS_MAX_PAGES: &str = "STOREBOARD_ORDERS_MAX_PAGES";
pub const UTC_OFFSET_MINUTES: &str = "STOREBOARD_UTC_OFFSET_MINUTES";

const MAX_TIMEOUT_SECS: u64 = 3600;
const MAX_OFFSET_MINUTES: i32 = 23 * 60 + 59;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not found")]
    Missing(&'static str),
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub orders_page_size: u32,
    pub orders_max_pages: u32,
    pub utc_offset: FixedOffset,
}

impl AppConfig {
    /// Reads the process environment. `base_url` (from the command line)
    /// takes precedence over `STOREBOARD_API_URL`.
    pub fn from_env(base_url: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(base_url, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        base_url: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = base_url
            .filter(|v| !v.trim().is_empty())
            .or_else(|| get(API_URL))
            .ok_or(ConfigError::Missing(API_URL))?;

        let timeout_secs: u64 = parse_or(get(TIMEOUT_SECS), TIMEOUT_SECS, 15)?;
        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                name: TIMEOUT_SECS,
                value: timeout_secs.to_string(),
            });
        }

        let offset_minutes: i32 = parse_or(get(UTC_OFFSET_MINUTES), UTC_OFFSET_MINUTES, 0)?;
        let utc_offset = (-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES)
            .contains(&offset_minutes)
            .then(|| FixedOffset::east_opt(offset_minutes * 60))
            .flatten()
            .ok_or(ConfigError::Invalid {
                name: UTC_OFFSET_MINUTES,
                value: offset_minutes.to_string(),
            })?;

        Ok(AppConfig {
            api_url,
            api_token: get(API_TOKEN),
            timeout: Duration::from_secs(timeout_secs.max(1)),
            orders_page_size: parse_or(get(ORDERS_PAGE_SIZE), ORDERS_PAGE_SIZE, 1000)?,
            orders_max_pages: parse_or(get(ORDERS_MAX_PAGES), ORDERS_MAX_PAGES, 1)?,
            utc_offset,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .base_url(self.api_url.clone())
            .maybe_api_token(self.api_token.clone())
            .timeout(self.timeout)
            .build()
    }

    /// Stage timeout leaves room for the HTTP timeout to fire first.
    pub fn reporting_config(&self, week_start: WeekStart) -> ReportingConfig {
        ReportingConfig {
            orders_page_size: self.orders_page_size,
            orders_max_pages: self.orders_max_pages,
            week_start,
            utc_offset: self.utc_offset,
            stage_timeout: self
                .timeout
                .saturating_mul(self.orders_max_pages.max(1))
                .saturating_add(Duration::from_secs(5)),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}
