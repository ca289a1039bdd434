// src/services/dates.rs
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Asia::Singapore;

/// Saturates at the earliest representable instant.
pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Accepts RFC 2822 (RSS `pubDate`) or RFC 3339 (Atom) timestamps.
pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Dashboard display format, in Singapore time.
pub fn display_sgt(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Singapore).format("%Y-%m-%d %H:%M SGT").to_string()
}
