//! Display formatting for dates, relative times, file sizes and text
//!
//! These helpers produce the strings shown in claim tables, detail views
//! and reports. All of them are pure; callers pass `now` explicitly where
//! a reference time is needed so output is deterministic under test.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

/// Default date pattern, e.g. `Jan 15, 2024`
pub const DATE_PATTERN: &str = "%b %d, %Y";

/// Date and time pattern, e.g. `Jan 15, 2024 14:30`
pub const DATE_TIME_PATTERN: &str = "%b %d, %Y %H:%M";

/// Formats a calendar date, e.g. `Jan 15, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_PATTERN).to_string()
}

/// Formats a timestamp's date part with a custom strftime pattern
pub fn format_date_with(timestamp: &DateTime<Utc>, pattern: &str) -> String {
    timestamp.format(pattern).to_string()
}

/// Formats a timestamp as date and time, e.g. `Jan 15, 2024 14:30`
pub fn format_date_time(timestamp: &DateTime<Utc>) -> String {
    format_date_with(timestamp, DATE_TIME_PATTERN)
}

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_YEAR: i64 = 525_600;

/// Describes the distance between `then` and `now` in words
///
/// Past instants read `3 days ago`, future ones `in 3 days`.
pub fn format_relative(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = (*now - *then).num_seconds();
    let phrase = distance_in_words(seconds.abs());

    if seconds >= 0 {
        format!("{} ago", phrase)
    } else {
        format!("in {}", phrase)
    }
}

fn distance_in_words(seconds: i64) -> String {
    let minutes = (seconds + 30) / 60;

    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        m if m < 45 => format!("{} minutes", m),
        m if m < 90 => "about 1 hour".to_string(),
        m if m < MINUTES_IN_DAY => format!("about {} hours", rounded_div(m, 60)),
        m if m < 2_520 => "1 day".to_string(),
        m if m < MINUTES_IN_MONTH => format!("{} days", rounded_div(m, MINUTES_IN_DAY)),
        m if m < 2 * MINUTES_IN_MONTH => {
            let months = rounded_div(m, MINUTES_IN_MONTH);
            if months <= 1 {
                "about 1 month".to_string()
            } else {
                format!("about {} months", months)
            }
        }
        m if m < MINUTES_IN_YEAR => format!("{} months", rounded_div(m, MINUTES_IN_MONTH)),
        m => {
            let months = m / MINUTES_IN_MONTH;
            let years = months / 12;
            let remainder = months % 12;
            if remainder < 3 {
                format!("about {}", plural(years, "year"))
            } else if remainder < 9 {
                format!("over {}", plural(years, "year"))
            } else {
                format!("almost {}", plural(years + 1, "year"))
            }
        }
    }
}

fn rounded_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Renders a byte count with 1024-based units, e.g. `1.5 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[exponent])
}

/// Cuts text to `max_chars` characters, appending `...` when shortened
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

/// Upper-cases the first character and lower-cases the rest
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Groups items by a derived key; groups keep the items' original order
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 05, 2024");
    }

    #[test]
    fn test_format_date_time() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        assert_eq!(format_date_time(&ts), "Jan 15, 2024 14:30");
    }

    #[test]
    fn test_relative_past() {
        let now = now();
        assert_eq!(format_relative(&(now - Duration::seconds(10)), &now), "less than a minute ago");
        assert_eq!(format_relative(&(now - Duration::minutes(1)), &now), "1 minute ago");
        assert_eq!(format_relative(&(now - Duration::minutes(5)), &now), "5 minutes ago");
        assert_eq!(format_relative(&(now - Duration::minutes(60)), &now), "about 1 hour ago");
        assert_eq!(format_relative(&(now - Duration::hours(2)), &now), "about 2 hours ago");
        assert_eq!(format_relative(&(now - Duration::hours(30)), &now), "1 day ago");
        assert_eq!(format_relative(&(now - Duration::days(3)), &now), "3 days ago");
        assert_eq!(format_relative(&(now - Duration::days(35)), &now), "about 1 month ago");
        assert_eq!(format_relative(&(now - Duration::days(120)), &now), "4 months ago");
        assert_eq!(format_relative(&(now - Duration::days(400)), &now), "about 1 year ago");
    }

    #[test]
    fn test_relative_future() {
        let now = now();
        assert_eq!(format_relative(&(now + Duration::days(2)), &now), "in 2 days");
    }

    #[test]
    fn test_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer sentence", 8), "a longer...");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("iN_REVIEW"), "In_review");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_group_by() {
        let groups = group_by(vec!["apple", "avocado", "banana"], |s| s.chars().next());
        assert_eq!(groups[&Some('a')], vec!["apple", "avocado"]);
        assert_eq!(groups[&Some('b')], vec!["banana"]);
    }
}
