use chrono::{Datelike, Duration, NaiveDate};
use storeboard_shared_models::{Granularity, WeekStart};

/// Start date of the bucket containing `date`.
pub fn bucket_start(date: NaiveDate, granularity: Granularity, week_start: WeekStart) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            let offset = match week_start {
                WeekStart::Sunday => date.weekday().num_days_from_sunday(),
                WeekStart::Monday => date.weekday().num_days_from_monday(),
            };
            date - Duration::days(i64::from(offset))
        }
        Granularity::Month => date.with_day(1).unwrap_or(date),
    }
}

/// Display label for a bucket starting at `start`. Formatting only, no
/// alignment is applied.
pub fn format_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => start.format("%b %-d").to_string(),
        Granularity::Week => format!("Week of {}", start.format("%b %-d")),
        Granularity::Month => start.format("%b %Y").to_string(),
    }
}
