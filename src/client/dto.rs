use serde::{Deserialize, Serialize};

/// `GET /api/courses/{id}` as the edit form consumes it. Dates stay as the
/// strings the server sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseRecord {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructor_id: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoursePayload {
    pub course_name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub instructor_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct NotifyRequest {
    pub course_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
