use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct ParseModelError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Bucket size used both by the analytics endpoint (`groupBy`) and by the
/// client-side aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart period selector. Each period implies a granularity and a lookback
/// window ending at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl ReportPeriod {
    pub fn granularity(&self) -> Granularity {
        match self {
            ReportPeriod::Daily => Granularity::Day,
            ReportPeriod::Weekly => Granularity::Week,
            ReportPeriod::Monthly => Granularity::Month,
        }
    }

    /// Lookback window ending at `now`: 7 days, 42 days or 6 calendar months.
    pub fn lookback(&self, now: DateTime<Utc>) -> DateRange {
        let start = match self {
            ReportPeriod::Daily => now - Duration::days(7),
            ReportPeriod::Weekly => now - Duration::days(42),
            ReportPeriod::Monthly => now
                .checked_sub_months(Months::new(6))
                .unwrap_or(now - Duration::days(183)),
        };

        DateRange { start, end: now }
    }
}

impl FromStr for ReportPeriod {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(ReportPeriod::Daily),
            "weekly" | "week" | "w" => Ok(ReportPeriod::Weekly),
            "monthly" | "month" | "m" => Ok(ReportPeriod::Monthly),
            _ => Err(ParseModelError {
                kind: "period",
                value: s.to_string(),
                expected: "daily, weekly, monthly",
            }),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::Daily => write!(f, "daily"),
            ReportPeriod::Weekly => write!(f, "weekly"),
            ReportPeriod::Monthly => write!(f, "monthly"),
        }
    }
}

/// Which field of a [`TimeSeriesPoint`] the chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Revenue,
    Orders,
}

impl MetricType {
    pub fn value(&self, point: &TimeSeriesPoint) -> f64 {
        match self {
            MetricType::Revenue => point.revenue,
            MetricType::Orders => point.orders as f64,
        }
    }
}

impl FromStr for MetricType {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" | "sales" => Ok(MetricType::Revenue),
            "orders" | "count" => Ok(MetricType::Orders),
            _ => Err(ParseModelError {
                kind: "metric",
                value: s.to_string(),
                expected: "revenue, orders",
            }),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::Revenue => write!(f, "revenue"),
            MetricType::Orders => write!(f, "orders"),
        }
    }
}

/// First day of a weekly bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl FromStr for WeekStart {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(ParseModelError {
                kind: "week start",
                value: s.to_string(),
                expected: "sunday, monday",
            }),
        }
    }
}

/// Inclusive instant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub period: String,
    pub revenue: f64,
    pub orders: u64,
}
