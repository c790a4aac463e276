//! Field alias tables for backend payloads.
//!
//! The backend has shipped several naming schemes for the same concept over
//! time. Each target field has one ordered alias list here; lookups walk the
//! list and take the first alias whose value parses.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

/// Explicit label fields, used verbatim.
pub const PERIOD_LABEL_FIELDS: &[&str] = &["period", "date", "label", "periodLabel", "name"];

/// Raw bucket fields. Date values get formatted, other text is used verbatim.
pub const RAW_DATE_FIELDS: &[&str] = &["_id", "day", "bucket", "timestamp"];

/// Bucket start fields a label can be derived from.
pub const START_DATE_FIELDS: &[&str] = &["startDate", "start_date", "periodStart", "bucketStart"];

pub const REVENUE_FIELDS: &[&str] = &[
    "revenue",
    "totalRevenue",
    "total_revenue",
    "totalSales",
    "sales",
    "totalAmount",
    "amount",
    "total",
];

pub const ORDER_COUNT_FIELDS: &[&str] = &["orders", "orderCount", "order_count", "totalOrders", "count"];

pub const ORDER_CREATED_FIELDS: &[&str] = &[
    "createdAt",
    "created_at",
    "orderDate",
    "order_date",
    "date",
    "placedAt",
];

pub const ORDER_AMOUNT_FIELDS: &[&str] = &[
    "totalAmount",
    "total",
    "total_amount",
    "grandTotal",
    "amount",
];

/// Returns the first alias value accepted by `parse`, in alias order.
pub fn resolve<T>(
    record: &Record,
    aliases: &[&str],
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    aliases
        .iter()
        .filter_map(|alias| record.get(*alias))
        .find_map(parse)
}

/// Finite number, or a string holding one.
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Non-empty text. Numbers are rendered as text.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses an instant from RFC 3339, naive date-time, plain date or epoch
/// milliseconds. Values without an offset are read in `offset`.
pub fn as_instant(value: &Value, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        Value::String(s) => parse_instant_str(s.trim(), offset),
        _ => None,
    }
}

fn parse_instant_str(s: &str, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = s
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| s.parse::<NaiveDate>().ok()?.and_hms_opt(0, 0, 0))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Calendar date of an instant as seen in `offset`.
pub fn local_date(instant: &DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    instant.with_timezone(offset).date_naive()
}
