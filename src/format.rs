use chrono::{DateTime, Datelike, Utc};

/// Human-friendly age of a timestamp relative to `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{} minute{} ago", mins, plural(mins));
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{} day{} ago", days, plural(days));
    }
    if then.year() == now.year() {
        then.format("%b %-d").to_string()
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}

/// Compact count rendering: 999 stays 999, 1200 becomes "1.2K".
pub fn format_count(n: i64) -> String {
    let magnitude = n.abs();
    if magnitude >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if magnitude >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn recent_times_are_relative() {
        assert_eq!(relative_time(now() - Duration::seconds(30), now()), "just now");
        assert_eq!(
            relative_time(now() - Duration::minutes(1), now()),
            "1 minute ago"
        );
        assert_eq!(
            relative_time(now() - Duration::hours(5), now()),
            "5 hours ago"
        );
        assert_eq!(
            relative_time(now() - Duration::days(3), now()),
            "3 days ago"
        );
    }

    #[test]
    fn older_times_fall_back_to_dates() {
        assert_eq!(
            relative_time(Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap(), now()),
            "Jan 5"
        );
        assert_eq!(
            relative_time(Utc.with_ymd_and_hms(2025, 11, 20, 0, 0, 0).unwrap(), now()),
            "Nov 20, 2025"
        );
    }

    #[test]
    fn counts_abbreviate_thousands() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_200), "1.2K");
        assert_eq!(format_count(2_500_000), "2.5M");
        assert_eq!(format_count(-42), "-42");
    }
}
