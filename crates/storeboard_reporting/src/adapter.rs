use crate::aliases::{
    self, ORDER_COUNT_FIELDS, PERIOD_LABEL_FIELDS, RAW_DATE_FIELDS, REVENUE_FIELDS,
    START_DATE_FIELDS, Record,
};
use crate::bucket::format_label;
use crate::error::FallbackReason;
use chrono::{FixedOffset, NaiveDate};
use itertools::Itertools;
use serde_json::Value;
use std::collections::HashMap;
use storeboard_shared_models::{Granularity, TimeSeriesPoint};
use tracing::debug;

/// Label of a record whose period could not be resolved.
pub const UNKNOWN_PERIOD: &str = "Unknown";

/// One analytics record after alias resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    /// `None` stands for [`UNKNOWN_PERIOD`].
    pub period: Option<String>,
    pub sort_key: Option<NaiveDate>,
    pub revenue: f64,
    pub orders: u64,
}

impl ResolvedRecord {
    fn is_noise(&self) -> bool {
        self.period.is_none() && self.revenue == 0.0 && self.orders == 0
    }
}

/// Normalizes pre-aggregated analytics records into a series.
#[derive(Debug, Clone)]
pub struct AnalyticsAdapter {
    granularity: Granularity,
    offset: FixedOffset,
}

impl AnalyticsAdapter {
    pub fn new(granularity: Granularity, offset: FixedOffset) -> Self {
        Self {
            granularity,
            offset,
        }
    }

    pub fn resolve(&self, record: &Record) -> ResolvedRecord {
        let revenue = aliases::resolve(record, REVENUE_FIELDS, aliases::as_number)
            .filter(|v| *v > 0.0)
            .unwrap_or(0.0);
        let orders = aliases::resolve(record, ORDER_COUNT_FIELDS, aliases::as_number)
            .filter(|v| *v > 0.0)
            .map(|v| v.round() as u64)
            .unwrap_or(0);

        ResolvedRecord {
            period: self.resolve_period(record),
            sort_key: self.resolve_sort_key(record),
            revenue,
            orders,
        }
    }

    fn resolve_period(&self, record: &Record) -> Option<String> {
        // Text labels are kept verbatim, epoch numbers are formatted.
        let explicit = aliases::resolve(record, PERIOD_LABEL_FIELDS, |value| match value {
            Value::Number(_) => self.date_label(value).or_else(|| known_text(value)),
            _ => known_text(value),
        });

        let raw = || {
            aliases::resolve(record, RAW_DATE_FIELDS, |value| {
                self.date_label(value).or_else(|| known_text(value))
            })
        };

        let derived = || aliases::resolve(record, START_DATE_FIELDS, |value| self.date_label(value));

        explicit.or_else(raw).or_else(derived)
    }

    fn date_label(&self, value: &Value) -> Option<String> {
        aliases::as_instant(value, &self.offset)
            .map(|instant| format_label(aliases::local_date(&instant, &self.offset), self.granularity))
    }

    fn resolve_sort_key(&self, record: &Record) -> Option<NaiveDate> {
        [PERIOD_LABEL_FIELDS, RAW_DATE_FIELDS, START_DATE_FIELDS]
            .into_iter()
            .find_map(|fields| {
                aliases::resolve(record, fields, |value| aliases::as_instant(value, &self.offset))
            })
            .map(|instant| aliases::local_date(&instant, &self.offset))
    }

    /// Turns raw records into a series, or asks for fallback when no record
    /// carries a usable period label. An empty record set is an empty series.
    pub fn normalize(&self, records: &[Value]) -> Result<Vec<TimeSeriesPoint>, FallbackReason> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let resolved = records
            .iter()
            .filter_map(Value::as_object)
            .map(|record| self.resolve(record))
            .collect::<Vec<_>>();

        if resolved.iter().all(|r| r.period.is_none()) {
            return Err(FallbackReason::UnusableShape {
                records: records.len(),
            });
        }

        let mut points: Vec<(Option<NaiveDate>, TimeSeriesPoint)> = Vec::new();
        let mut by_label: HashMap<String, usize> = HashMap::new();
        let mut dropped = 0usize;

        for record in resolved {
            if record.is_noise() {
                dropped += 1;
                continue;
            }

            let label = record.period.unwrap_or_else(|| UNKNOWN_PERIOD.to_string());
            match by_label.get(&label) {
                Some(&idx) => {
                    let (key, point) = &mut points[idx];
                    point.revenue += record.revenue;
                    point.orders += record.orders;
                    *key = match (*key, record.sort_key) {
                        (Some(a), Some(b)) => Some(a.min(b)),
                        (a, b) => a.or(b),
                    };
                }
                None => {
                    by_label.insert(label.clone(), points.len());
                    points.push((
                        record.sort_key,
                        TimeSeriesPoint {
                            period: label,
                            revenue: record.revenue,
                            orders: record.orders,
                        },
                    ));
                }
            }
        }

        if dropped > 0 {
            debug!(dropped, "dropped unlabeled empty analytics records");
        }

        // Without a date for every point the server order is the best we have.
        let series = if points.iter().all(|(key, _)| key.is_some()) {
            points
                .into_iter()
                .sorted_by_key(|(key, _)| *key)
                .map(|(_, point)| point)
                .collect()
        } else {
            points.into_iter().map(|(_, point)| point).collect()
        };

        Ok(series)
    }
}

fn known_text(value: &Value) -> Option<String> {
    aliases::as_text(value).filter(|s| !s.eq_ignore_ascii_case(UNKNOWN_PERIOD))
}
