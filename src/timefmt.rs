// src/timefmt.rs
//! Timestamp helpers shared by the pipeline stages.
//!
//! Stored timestamps are ISO-8601 strings. Anything that does not parse is
//! reported as `None` and callers decide what absence means for them.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, SecondsFormat, Utc};

/// Display format used on the rendered page.
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Parse an ISO-8601 timestamp. Offset-less values are taken as UTC.
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|n| n.and_utc())
}

/// `published` form: second precision, `+00:00` offset. Fixed width so that
/// string order equals chronological order.
pub fn to_published_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// `fetched_at` form: microsecond precision, `+00:00` offset.
pub fn to_fetched_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// `now - window`, saturating at the earliest representable instant.
pub fn window_cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Fixed display offset, e.g. `9` for JST. Out-of-range hours fall back to UTC.
pub fn display_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.saturating_mul(3600)).unwrap_or_else(|| Utc.fix())
}

/// ISO-8601 → `YYYY/MM/DD HH:MM` in the display offset. Empty on parse failure.
pub fn format_local(iso: &str, offset: FixedOffset) -> String {
    match parse_iso(iso) {
        Some(dt) => dt.with_timezone(&offset).format(DISPLAY_FORMAT).to_string(),
        None => String::new(),
    }
}
