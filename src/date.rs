//! Canonical `YYYY-MM-DD` date strings and small calendar helpers.
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Month};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse a canonical `YYYY-MM-DD` date string.
///
/// Impossible dates such as `2023-02-29` are rejected rather than rolled
/// over into the following month.
pub fn parse_date(s: &str) -> Result<Date, DateError> {
    Date::parse(s.trim(), &YMD_FMT).map_err(|source| DateError {
        value: s.to_owned(),
        source,
    })
}

/// Format a date as a canonical `YYYY-MM-DD` string with a one-based,
/// zero-padded month.
pub fn format_date(date: Date) -> String {
    format_ymd(date.year(), date.month(), date.day())
}

pub fn format_ymd(year: i32, month: Month, day: u8) -> String {
    format!("{year:04}-{:02}-{day:02}", u8::from(month))
}

/// Zero-based index of `month` (January = 0)
pub fn month0(month: Month) -> u8 {
    u8::from(month) - 1
}

/// Inverse of [`month0()`]; `None` for anything above 11
pub fn month_from0(index: u8) -> Option<Month> {
    index
        .checked_add(1)
        .and_then(|m| Month::try_from(m).ok())
}

pub fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::February if time::util::is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// The (year, month) immediately before the given one
pub fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        m => (year, m.previous()),
    }
}

/// The (year, month) immediately after the given one
pub fn next_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::December => (year + 1, Month::January),
        m => (year, m.next()),
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date {value:?}; expected YYYY-MM-DD")]
pub struct DateError {
    value: String,
    #[source]
    source: time::error::Parse,
}

impl DateError {
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29"), Ok(date!(2024 - 02 - 29)));
        assert_eq!(parse_date(" 1999-12-31 "), Ok(date!(1999 - 12 - 31)));
    }

    #[test]
    fn test_parse_impossible_day() {
        let e = parse_date("2023-02-29").unwrap_err();
        assert_eq!(e.value(), "2023-02-29");
    }

    #[test]
    fn test_parse_malformed() {
        for s in ["", "2024", "2024-2-3", "2024/02/03", "24-02-03", "2024-13-01", "tomorrow"] {
            assert!(parse_date(s).is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date!(2024 - 02 - 09)), "2024-02-09");
        assert_eq!(format_date(date!(987 - 11 - 30)), "0987-11-30");
    }

    #[test]
    fn test_month0() {
        assert_eq!(month0(Month::January), 0);
        assert_eq!(month0(Month::December), 11);
        assert_eq!(month_from0(0), Some(Month::January));
        assert_eq!(month_from0(11), Some(Month::December));
        assert_eq!(month_from0(12), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, Month::February), 29);
        assert_eq!(days_in_month(2023, Month::February), 28);
        assert_eq!(days_in_month(1900, Month::February), 28);
        assert_eq!(days_in_month(2000, Month::February), 29);
        assert_eq!(days_in_month(2024, Month::April), 30);
        assert_eq!(days_in_month(2024, Month::December), 31);
    }

    #[test]
    fn test_adjacent_months() {
        assert_eq!(previous_month(2024, Month::January), (2023, Month::December));
        assert_eq!(previous_month(2024, Month::March), (2024, Month::February));
        assert_eq!(next_month(2024, Month::December), (2025, Month::January));
        assert_eq!(next_month(2024, Month::June), (2024, Month::July));
    }
}
