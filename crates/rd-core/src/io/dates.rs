//! Lenient calendar-date parsing for month columns

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%d %B %Y", "%B %d, %Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

// Formats without a day; parsed with a synthetic day of 1 appended.
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%b %Y", "%B %Y", "%b-%Y", "%B-%Y", "%Y-%b"];

/// Parse a cell as a calendar date
///
/// Accepts full dates, date-times, and year-month forms such as `2023-01`
/// or `Jan 2023`. Returns `None` for anything else.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            let padded = format!("{} 01", cell);
            MONTH_FORMATS.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(&padded, &format!("{} %d", fmt)).ok()
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_full_dates() {
        assert_eq!(parse_date("2023-03-15").map(|d| d.month()), Some(3));
        assert_eq!(parse_date("2023/11/02").map(|d| d.month()), Some(11));
        assert_eq!(parse_date("07/04/2022").map(|d| d.month()), Some(7));
        assert_eq!(parse_date("2023-05-01T10:30:00").map(|d| d.month()), Some(5));
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_date("2023-01").map(|d| d.month()), Some(1));
        assert_eq!(parse_date("Feb 2024").map(|d| d.month()), Some(2));
        assert_eq!(parse_date("December 2021").map(|d| d.month()), Some(12));
        assert_eq!(parse_date("2020-Aug").map(|d| d.month()), Some(8));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-13"), None);
        assert_eq!(parse_date(""), None);
    }
}
