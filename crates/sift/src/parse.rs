//! Date and time-of-day parsing.
//!
//! Text values are tried against an ordered list of layouts and the first
//! layout that parses wins.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Date-time layouts, tried after RFC 3339.
pub const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts, tried after the date-time layouts.
pub const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Time-of-day layouts.
pub const TIME_LAYOUTS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M %p"];

/// Parses a date or date-time.
///
/// Offsets in RFC 3339 input are folded into UTC. Date-only input lands on
/// midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt);
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parses a time of day. Full date-times are accepted and keep only their time.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for layout in TIME_LAYOUTS {
        if let Ok(time) = NaiveTime::parse_from_str(text, layout) {
            return Some(time);
        }
    }
    parse_datetime(text).map(|dt| dt.time())
}

/// Returns `true` if any of hour, minute, second or fraction is non-zero.
pub fn has_time_component(dt: &NaiveDateTime) -> bool {
    dt.hour() != 0 || dt.minute() != 0 || dt.second() != 0 || dt.nanosecond() != 0
}
