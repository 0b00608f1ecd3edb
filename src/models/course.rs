use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub course_id: i64,
    pub course_name: String,
    pub description: String,
    pub instructor_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_weeks: Option<i64>,
    pub enrollment_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub course_name: String,
    pub description: String,
    pub instructor_id: i64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration_weeks: Option<i64>,
}

/// Body of `PUT /api/courses/{id}`.
///
/// `duration_weeks` is optional; when present the end date must match it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub course_name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub instructor_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNotifyRequest {
    pub course_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNotifyResponse {
    pub course_id: i64,
    pub notified: u64,
}

/// Calendar end date of a course running `weeks` weeks from `start`.
///
/// `None` for non-positive durations or dates past the calendar range.
pub fn end_date_for(start: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    if weeks <= 0 {
        return None;
    }
    let days = u64::try_from(weeks).ok()?.checked_mul(7)?;
    start.checked_add_days(Days::new(days))
}

/// Whole number of weeks from `start` to `end`, if the span is one.
pub fn weeks_between(start: NaiveDate, end: NaiveDate) -> Option<i64> {
    let days = (end - start).num_days();
    (days > 0 && days % 7 == 0).then_some(days / 7)
}
