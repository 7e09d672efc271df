//! Date formats the backend and the form inputs expect.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// `YYYY-MM-DD HH:MM:SS`, the timestamp format the API accepts.
pub const API_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `YYYY-MM-DDTHH:MM`, the value format of a datetime-local input.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses an RFC 3339 timestamp, a zone-less date-time (taken as local
/// time) or a bare date (taken as UTC midnight).
pub fn parse_date(input: &str) -> Option<DateTime<Local>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(&Local))
}

/// Formats `input` in local time as `YYYY-MM-DD HH:MM:SS`. Input that does
/// not parse is replaced by the current time.
pub fn format_date_for_api(input: &str) -> String {
    let date = parse_date(input).unwrap_or_else(|| {
        tracing::warn!(
            "Invalid date string {:?}, falling back to current time",
            input
        );
        Local::now()
    });
    date.format(API_FORMAT).to_string()
}

/// The current local time as `YYYY-MM-DD HH:MM:SS`.
pub fn now_for_api() -> String {
    Local::now().format(API_FORMAT).to_string()
}

/// Formats `input` for a datetime-local input, or returns an empty string
/// when it is blank or does not parse.
pub fn format_date_time_for_input(input: &str) -> String {
    parse_date(input)
        .map(|date| date.format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

/// Formats `input` as a calendar date (`YYYY-MM-DD`) for printed documents.
/// A bare date is a calendar day and is kept as is; timestamps are shown in
/// local time. Returns `None` when `input` does not parse.
pub fn format_date_for_print(input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    parse_date(input).map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_input_is_kept_as_local_time() {
        assert_eq!(format_date_for_api("2024-03-05T14:07"), "2024-03-05 14:07:00");
        assert_eq!(
            format_date_for_api("2024-03-05 09:30:15"),
            "2024-03-05 09:30:15"
        );
    }

    #[test]
    fn rfc3339_is_converted_to_local() {
        let input = "2024-03-05T14:07:09Z";
        let expected = DateTime::parse_from_rfc3339(input)
            .unwrap()
            .with_timezone(&Local)
            .format(API_FORMAT)
            .to_string();
        assert_eq!(format_date_for_api(input), expected);
    }

    #[test]
    fn invalid_input_falls_back_to_now() {
        let out = format_date_for_api("not a date");
        assert!(NaiveDateTime::parse_from_str(&out, API_FORMAT).is_ok());
    }

    #[test]
    fn input_format() {
        assert_eq!(
            format_date_time_for_input("2024-11-30 08:15:00"),
            "2024-11-30T08:15"
        );
        assert_eq!(format_date_time_for_input(""), "");
        assert_eq!(format_date_time_for_input("31/12/2024"), "");
    }

    #[test]
    fn print_date_keeps_calendar_day() {
        assert_eq!(format_date_for_print("2024-06-01").as_deref(), Some("2024-06-01"));
        assert_eq!(
            format_date_for_print("2024-06-01 10:00:00").as_deref(),
            Some("2024-06-01")
        );
        assert_eq!(format_date_for_print("June 1st"), None);
    }
}
