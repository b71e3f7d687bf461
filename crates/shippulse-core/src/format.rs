//! Relative-time and duration formatting.
//!
//! Both formatters are total, pure functions: [`format_time_ago`] takes
//! `now` explicitly rather than reading the clock, and out-of-domain input
//! (future timestamps, negative durations) clamps instead of erroring.

use chrono::{DateTime, Utc};

/// Format how long ago `timestamp` was, relative to `now`.
///
/// Absent timestamps render `"never"`. Under an hour the unit is minutes
/// (always plural, matching the wire copy); under a day, hours; beyond
/// that, days without any week/month/year switch. Hours and days use the
/// singular form exactly at 1. Future timestamps clamp to zero elapsed.
#[must_use]
pub fn format_time_ago(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp else {
        return "never".to_owned();
    };

    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes().max(0);
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return if hours == 1 {
            "1 hour ago".to_owned()
        } else {
            format!("{hours} hours ago")
        };
    }

    let days = elapsed.num_days();
    if days == 1 {
        "1 day ago".to_owned()
    } else {
        format!("{days} days ago")
    }
}

/// Format an hour count as a compact duration.
///
/// At 24 hours and above the unit switches to fractional days with one
/// decimal (`"1.5 days"`). Below that, whole hours plus the remainder in
/// minutes (`"3h 15m"`); the minutes segment is omitted when the remainder
/// rounds to zero, and a remainder that rounds to a full hour carries
/// (`23.999 → "24h"`). Negative input clamps to `"0h"`.
#[must_use]
pub fn format_hours(value: f64) -> String {
    if value.is_nan() || value <= 0.0 {
        return "0h".to_owned();
    }
    if value >= 24.0 {
        return format!("{:.1} days", value / 24.0);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut hours = value.trunc() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut minutes = (value.fract() * 60.0).round() as u32;
    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }

    if minutes == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn absent_timestamp_is_never() {
        assert_eq!(format_time_ago(None, now()), "never");
    }

    #[test]
    fn minutes_under_an_hour() {
        let now = now();
        assert_eq!(
            format_time_ago(Some(now - Duration::minutes(59)), now),
            "59 minutes ago"
        );
        assert_eq!(
            format_time_ago(Some(now - Duration::minutes(5)), now),
            "5 minutes ago"
        );
    }

    #[test]
    fn minutes_stay_plural_at_one() {
        // Only hours and days have singular forms.
        let now = now();
        assert_eq!(
            format_time_ago(Some(now - Duration::minutes(1)), now),
            "1 minutes ago"
        );
    }

    #[test]
    fn hour_boundary_switches_units() {
        let now = now();
        assert_eq!(
            format_time_ago(Some(now - Duration::minutes(60)), now),
            "1 hour ago"
        );
        assert_eq!(
            format_time_ago(Some(now - Duration::hours(5)), now),
            "5 hours ago"
        );
        assert_eq!(
            format_time_ago(Some(now - Duration::minutes(23 * 60 + 59)), now),
            "23 hours ago"
        );
    }

    #[test]
    fn day_boundary_switches_units() {
        let now = now();
        assert_eq!(
            format_time_ago(Some(now - Duration::hours(24)), now),
            "1 day ago"
        );
        assert_eq!(
            format_time_ago(Some(now - Duration::days(3)), now),
            "3 days ago"
        );
    }

    #[test]
    fn days_are_unbounded() {
        let now = now();
        assert_eq!(
            format_time_ago(Some(now - Duration::days(400)), now),
            "400 days ago"
        );
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        let now = now();
        assert_eq!(
            format_time_ago(Some(now + Duration::minutes(10)), now),
            "0 minutes ago"
        );
    }

    #[test]
    fn hours_with_minute_remainder() {
        assert_eq!(format_hours(23.5), "23h 30m");
        assert_eq!(format_hours(3.25), "3h 15m");
        assert_eq!(format_hours(0.25), "0h 15m");
    }

    #[test]
    fn whole_hours_omit_minutes() {
        assert_eq!(format_hours(3.0), "3h");
        assert_eq!(format_hours(0.0), "0h");
    }

    #[test]
    fn day_unit_at_twenty_four_hours() {
        assert_eq!(format_hours(24.0), "1.0 days");
        assert_eq!(format_hours(36.0), "1.5 days");
        assert_eq!(format_hours(72.0), "3.0 days");
    }

    #[test]
    fn near_full_hour_remainder_carries() {
        assert_eq!(format_hours(23.999), "24h");
        assert_eq!(format_hours(2.9999), "3h");
    }

    #[test]
    fn negative_and_nan_clamp_to_zero_hours() {
        assert_eq!(format_hours(-5.0), "0h");
        assert_eq!(format_hours(f64::NAN), "0h");
    }
}
