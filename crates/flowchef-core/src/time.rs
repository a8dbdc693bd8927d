//! `savedAt` timestamp conventions.
//!
//! Timestamps are persisted as ISO-8601 strings with millisecond precision
//! in UTC. Comparisons happen on milliseconds since the Unix epoch; anything
//! that cannot be parsed compares as the epoch itself.

use jiff::Timestamp;
use jiff::civil::Date;
use tracing::warn;

/// The timestamp assigned to imported recipes that carry none.
pub const EPOCH: &str = "1970-01-01T00:00:00.000Z";

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(ts: Timestamp) -> String {
    let whole = ts.strftime("%Y-%m-%dT%H:%M:%S");
    format!("{whole}.{:03}Z", ts.subsec_millisecond())
}

/// Milliseconds since the epoch for a stored `savedAt` value.
///
/// Accepts RFC 3339 timestamps (any offset) and bare `YYYY-MM-DD` dates,
/// read as midnight UTC. Returns 0 for anything else.
pub fn parse_millis(value: &str) -> i64 {
    if let Ok(ts) = value.parse::<Timestamp>() {
        return ts.as_millisecond();
    }
    if let Ok(date) = value.parse::<Date>()
        && let Ok(ts) = date.to_zoned(jiff::tz::TimeZone::UTC).map(|z| z.timestamp())
    {
        return ts.as_millisecond();
    }
    warn!(value, "unparseable timestamp, treating as epoch");
    0
}

/// Milliseconds for an optional `savedAt`; absence is the epoch.
pub fn millis_or_epoch(value: Option<&str>) -> i64 {
    value.map(parse_millis).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_constant_matches_formatter() {
        assert_eq!(format_timestamp(Timestamp::UNIX_EPOCH), EPOCH);
        assert_eq!(parse_millis(EPOCH), 0);
    }

    #[test]
    fn millisecond_precision_is_kept() {
        let ts = Timestamp::from_millisecond(1_700_000_000_123).unwrap();
        let s = format_timestamp(ts);
        assert_eq!(s, "2023-11-14T22:13:20.123Z");
        assert_eq!(parse_millis(&s), 1_700_000_000_123);
    }

    #[test]
    fn offsets_and_bare_dates() {
        assert_eq!(
            parse_millis("2024-01-01T01:00:00+01:00"),
            parse_millis("2024-01-01T00:00:00Z")
        );
        assert_eq!(parse_millis("2024-01-01"), parse_millis("2024-01-01T00:00:00.000Z"));
    }

    #[test]
    fn garbage_is_epoch() {
        assert_eq!(parse_millis("yesterday-ish"), 0);
        assert_eq!(parse_millis(""), 0);
        assert_eq!(millis_or_epoch(None), 0);
    }
}
