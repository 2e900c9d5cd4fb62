use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried in order; the first that parses wins.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only layouts; month-first before day-first for ambiguous slashes.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d %b %Y",
    "%d %B %Y",
];

/// Parse a free-form date or date-time string into a naive timestamp.
/// RFC 3339 inputs with an offset are converted to their UTC wall time.
/// Returns `None` when no known layout matches.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.len() < 6 {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        assert_eq!(parse_timestamp("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_timestamp("2024/03/05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_timestamp(" 2024-03-05 "), Some(ymd(2024, 3, 5)));
        assert_eq!(
            parse_timestamp("2024-03-05 14:30:00"),
            ymd(2024, 3, 5).date().and_hms_opt(14, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2024-03-05T14:30:00+02:00"),
            ymd(2024, 3, 5).date().and_hms_opt(12, 30, 0)
        );
    }

    #[test]
    fn slashes_are_month_first_unless_impossible() {
        assert_eq!(parse_timestamp("03/04/2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_timestamp("25/12/2023"), Some(ymd(2023, 12, 25)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2024-13-40"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
