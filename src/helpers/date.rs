//! Date helper functions
//!
//! Post dates are kept as the raw front-matter string. These helpers only
//! affect how a date is displayed.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a post date string in the common front-matter formats
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, keep the wall-clock time
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

/// Format a post date using a Moment.js-compatible format string.
///
/// Falls back to the raw string when it cannot be parsed.
///
/// # Examples
/// ```ignore
/// display_date("2024-01-15", "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn display_date(raw: &str, format: &str) -> String {
    let Some(date) = parse_date(raw) else {
        return raw.to_string();
    };

    let chrono_format = moment_to_chrono_format(format);
    let items: Vec<Item> = StrftimeItems::new(&chrono_format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::warn!("Invalid date format {:?}", format);
        return raw.to_string();
    }

    date.format_with_items(items.into_iter()).to_string()
}

/// Machine-readable form for `<time datetime="...">`, empty if unparseable
pub fn date_xml(raw: &str) -> String {
    parse_date(raw)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DD", "%d"),
        // Time
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();
    for (from, to) in replacements {
        result = result.replace(from, to);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        for raw in [
            "2024-01-15",
            "2024/01/15",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00+08:00",
        ] {
            let dt = parse_date(raw).unwrap_or_else(|| panic!("failed to parse {}", raw));
            assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
        }
        assert!(parse_date("someday").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-01-15", "MMMM DD, YYYY"), "January 15, 2024");
        assert_eq!(display_date("2024-01-15 08:05:00", "YYYY/MM/DD HH:mm"), "2024/01/15 08:05");
    }

    #[test]
    fn test_display_date_falls_back_to_raw() {
        assert_eq!(display_date("last spring", "YYYY-MM-DD"), "last spring");
        assert_eq!(display_date("", "YYYY-MM-DD"), "");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml("2024-01-15"), "2024-01-15T00:00:00");
        assert_eq!(date_xml("soon"), "");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
    }
}
