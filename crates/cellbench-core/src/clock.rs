//! Wall-clock helpers. Timestamps are milliseconds since the Unix epoch.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Full ISO-8601 UTC timestamp, e.g. `2026-02-15T01:30:00Z`.
pub fn format_iso8601(timestamp_ms: u64) -> String {
    let (year, month, day, hour, min, sec) = secs_to_utc(timestamp_ms / 1000);
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z")
}

/// `HH:MM:SS` UTC, used for chart axes and log lines.
pub fn format_clock(timestamp_ms: u64) -> String {
    let (_, _, _, hour, min, sec) = secs_to_utc(timestamp_ms / 1000);
    format!("{hour:02}:{min:02}:{sec:02}")
}

/// Whole seconds since the epoch.
pub fn epoch_secs(timestamp_ms: u64) -> u64 {
    Duration::from_millis(timestamp_ms).as_secs()
}

/// (year, month, day, hour, minute, second) UTC. No leap seconds.
fn secs_to_utc(secs: u64) -> (u64, u64, u64, u64, u64, u64) {
    let sec = secs % 60;
    let min = (secs / 60) % 60;
    let hour = (secs / 3600) % 24;

    let mut days = secs / 86400;
    let mut year = 1970u64;
    loop {
        let len = if is_leap(year) { 366 } else { 365 };
        if days < len {
            break;
        }
        days -= len;
        year += 1;
    }

    let feb = if is_leap(year) { 29 } else { 28 };
    let month_lengths = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1u64;
    for len in month_lengths {
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }

    (year, month, days + 1, hour, min, sec)
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_formats() {
        assert_eq!(format_iso8601(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_clock(0), "00:00:00");
    }

    #[test]
    fn known_timestamp() {
        // 2024-02-29T12:34:56Z
        let ms = 1_709_210_096_000;
        assert_eq!(format_iso8601(ms), "2024-02-29T12:34:56Z");
        assert_eq!(format_clock(ms + 999), "12:34:56");
        assert_eq!(epoch_secs(ms + 999), 1_709_210_096);
    }

    #[test]
    fn end_of_year() {
        // 2023-12-31T23:59:59Z
        assert_eq!(format_iso8601(1_704_067_199_000), "2023-12-31T23:59:59Z");
    }

    #[test]
    fn leap_years() {
        assert!(is_leap(2000));
        assert!(is_leap(2024));
        assert!(!is_leap(1900));
        assert!(!is_leap(2023));
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }
}
