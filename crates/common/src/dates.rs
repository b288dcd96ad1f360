use chrono::NaiveDate;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Cuts an ISO timestamp such as `2024-03-01T00:00:00.000Z` down to its day.
pub fn calendar_day(raw: &str) -> &str {
    raw.split('T').next().unwrap_or(raw).trim()
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(calendar_day(raw), DAY_FORMAT).ok()
}

/// Human-facing day, falling back to the raw text when it is not a date.
pub fn display_day(raw: &str) -> String {
    match parse_day(raw) {
        Some(day) => day.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}
