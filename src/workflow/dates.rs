use chrono::NaiveDate;

use crate::models::end_date_for;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Duration input as typed into the form.
pub fn parse_duration(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

/// End date shown for a start date and duration, or an empty string when
/// either is missing, unparseable, or the duration is not positive.
pub fn derive_end_date(start_date: &str, duration_weeks: Option<i64>) -> String {
    if start_date.is_empty() {
        return String::new();
    }
    duration_weeks
        .filter(|weeks| *weeks > 0)
        .and_then(|weeks| {
            let start = NaiveDate::parse_from_str(start_date, DATE_FORMAT).ok()?;
            end_date_for(start, weeks)
        })
        .map(|end| end.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
