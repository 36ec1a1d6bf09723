//! Relative timestamps for post cards ("3 days ago", "yesterday").

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    const fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Largest unit first. A month is a twelfth of a 365-day year.
const UNITS: [(Unit, f64); 6] = [
    (Unit::Year, DAY_MS * 365.0),
    (Unit::Month, DAY_MS * 365.0 / 12.0),
    (Unit::Day, DAY_MS),
    (Unit::Hour, 60.0 * 60.0 * 1000.0),
    (Unit::Minute, 60.0 * 1000.0),
    (Unit::Second, 1000.0),
];

/// Describe `then` relative to `now`, using the largest unit the gap exceeds.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn relative_time(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let elapsed = (then - now).num_milliseconds() as f64;

    let (unit, unit_ms) = UNITS
        .iter()
        .copied()
        .find(|&(_, unit_ms)| elapsed.abs() > unit_ms)
        .unwrap_or((Unit::Second, 1000.0));

    phrase((elapsed / unit_ms).round() as i64, unit)
}

/// [`relative_time`] against the current time.
#[must_use]
pub fn relative_to_now(then: DateTime<Utc>) -> String {
    relative_time(Utc::now(), then)
}

fn phrase(value: i64, unit: Unit) -> String {
    match (unit, value) {
        (Unit::Second, 0) => return "now".to_string(),
        (Unit::Day, 0) => return "today".to_string(),
        (Unit::Day, 1) => return "tomorrow".to_string(),
        (Unit::Day, -1) => return "yesterday".to_string(),
        (Unit::Minute | Unit::Hour | Unit::Month | Unit::Year, 0) => {
            return format!("this {}", unit.name());
        }
        (Unit::Month | Unit::Year, 1) => return format!("next {}", unit.name()),
        (Unit::Month | Unit::Year, -1) => return format!("last {}", unit.name()),
        _ => {}
    }

    let count = value.unsigned_abs();
    let plural = if count == 1 { "" } else { "s" };
    if value < 0 {
        format!("{count} {}{plural} ago", unit.name())
    } else {
        format!("in {count} {}{plural}", unit.name())
    }
}
