//! Calendar-date helpers for due dates and durations.

use anyhow::{Context, Result, bail};
use taskdeck_core::EpochMillis;
use taskdeck_core::clock::{from_epoch_millis, to_epoch_millis};
use time::macros::format_description;
use time::{Date, Time};

macro_rules! day_format {
    () => {
        format_description!("[year]-[month]-[day]")
    };
}

/// Parse `YYYY-MM-DD` as midnight UTC in epoch milliseconds.
///
/// # Errors
/// Returns an error for empty input or anything that is not a calendar day.
pub fn parse_day(input: &str) -> Result<EpochMillis> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("date must not be empty");
    }
    let date = Date::parse(trimmed, day_format!())
        .with_context(|| format!("invalid date '{trimmed}', expected YYYY-MM-DD"))?;
    Ok(to_epoch_millis(date.with_time(Time::MIDNIGHT).assume_utc()))
}

/// Render epoch milliseconds as a UTC `YYYY-MM-DD` day.
#[must_use]
pub fn format_day(millis: EpochMillis) -> String {
    from_epoch_millis(millis)
        .and_then(|at| at.date().format(day_format!()).ok())
        .unwrap_or_else(|| "-".to_owned())
}

/// Render a millisecond span as `1d 2h 3m`, dropping leading zero units.
#[must_use]
pub fn format_elapsed(millis: EpochMillis) -> String {
    let minutes = millis.max(0) / 60_000;
    let (days, hours, minutes) = (minutes / 1_440, (minutes / 60) % 24, minutes % 60);
    match (days, hours) {
        (0, 0) => format!("{minutes}m"),
        (0, _) => format!("{hours}h {minutes}m"),
        _ => format!("{days}d {hours}h {minutes}m"),
    }
}
