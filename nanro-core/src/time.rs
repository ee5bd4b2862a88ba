//! Time utilities: lenient API timestamps and zone-aware display.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone statements are rendered in unless the caller picks another.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Africa::Lagos;

/// Parse a `created_at` style timestamp.
///
/// Accepts RFC 3339, `2026-02-20 23:59:01`, `2026-02-20T23:59:01.123456`
/// (naive values are taken as UTC) and bare `2026-02-20` dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Parse an IANA zone name like "Africa/Lagos".
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse().ok()
}

/// Format a UTC instant in `tz` with a strftime pattern.
pub fn format_in_zone(dt: DateTime<Utc>, tz: Tz, fmt: &str) -> String {
    dt.with_timezone(&tz).format(fmt).to_string()
}

/// Epoch milliseconds, used for export file names.
pub fn epoch_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}
