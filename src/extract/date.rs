//! Publication date extraction from free article text.
//!
//! The school sites print dates as `11 декабря 2025, 10:28`: day, Russian
//! genitive month name, year, then a comma and a 24h clock time. Only the
//! first such substring in the text is considered. A page that shows both
//! an "updated" and a "published" stamp gets whichever comes first.

use chrono::{DateTime, FixedOffset, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::LOCAL_UTC_OFFSET_SECS;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})\s+([А-Яа-яЁё]+)\s+(\d{4}),\s*(\d{1,2}):(\d{2})")
        .expect("date pattern is valid")
});

/// Map a genitive Russian month name to its number.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "января" => 1,
        "февраля" => 2,
        "марта" => 3,
        "апреля" => 4,
        "мая" => 5,
        "июня" => 6,
        "июля" => 7,
        "августа" => 8,
        "сентября" => 9,
        "октября" => 10,
        "ноября" => 11,
        "декабря" => 12,
        _ => return None,
    };
    Some(month)
}

/// The fixed offset the sites publish their times in.
pub fn local_offset() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_UTC_OFFSET_SECS).expect("offset is within one day")
}

/// Extract the first `<day> <month> <year>, <hh>:<mm>` timestamp from `text`.
///
/// Returns `None` when nothing matches, when the first match uses an
/// unknown month word, or when the fields don't form a real time
/// (e.g. `31 февраля`).
pub fn extract_publish_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let caps = DATE_RE.captures(text)?;

    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;

    let parsed = local_offset()
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single();
    if parsed.is_none() {
        debug!(matched = &caps[0], "Date-like text is not a valid time");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_extracts_date_from_surrounding_text() {
        let dt = extract_publish_date("Опубликовано 11 декабря 2025, 10:28 в разделе новости").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.day(), 11);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 28);
        assert_eq!(dt.offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn test_month_name_is_case_insensitive() {
        let dt = extract_publish_date("3 МАРТА 2024, 9:05").unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour(), dt.minute()), (3, 3, 9, 5));
    }

    #[test]
    fn test_no_pattern_returns_none() {
        assert!(extract_publish_date("").is_none());
        assert!(extract_publish_date("Просто текст без даты").is_none());
        assert!(extract_publish_date("2025-12-11 10:28").is_none());
        assert!(extract_publish_date("11 декабря 2025 10:28").is_none());
    }

    #[test]
    fn test_unknown_month_returns_none() {
        assert!(extract_publish_date("11 december 2025, 10:28").is_none());
        assert!(extract_publish_date("11 декабрь 2025, 10:28").is_none());
    }

    #[test]
    fn test_only_first_match_is_used() {
        let text = "Обновлено 1 января 2024, 08:00. Опубликовано 2 февраля 2025, 09:30.";
        let dt = extract_publish_date(text).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 1));
    }

    #[test]
    fn test_first_match_with_bad_month_is_not_skipped() {
        let text = "5 числа 2024, 10:00 и потом 6 мая 2024, 11:00";
        assert!(extract_publish_date(text).is_none());
    }

    #[test]
    fn test_impossible_calendar_values_return_none() {
        assert!(extract_publish_date("31 февраля 2025, 10:00").is_none());
        assert!(extract_publish_date("10 мая 2025, 25:00").is_none());
    }

    #[test]
    fn test_month_number_covers_all_months() {
        let names = [
            "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа",
            "сентября", "октября", "ноября", "декабря",
        ];
        for (i, name) in names.iter().enumerate() {
            assert_eq!(month_number(name), Some(i as u32 + 1));
        }
    }
}
