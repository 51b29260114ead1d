use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// Formats a date as `DD/MM/YYYY` in the Buddhist era (+543 years).
/// Missing dates render as `"N/A"`.
pub fn thai_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!("{:02}/{:02}/{}", d.day(), d.month(), d.year() + 543),
        None => "N/A".to_string(),
    }
}

/// Formats a time-of-day as `HH:MM`.
///
/// Missing times render as `missing_token` (configurable; historical exports
/// used both `"00:00"` and `"N/A"`). A stored midnight also means "no punch"
/// in the source device and maps to the token.
pub fn format_time(time: Option<NaiveTime>, missing_token: &str) -> String {
    match time {
        Some(t) if t.hour() == 0 && t.minute() == 0 => missing_token.to_string(),
        Some(t) => format!("{:02}:{:02}", t.hour(), t.minute()),
        None => missing_token.to_string(),
    }
}
