use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum NotificationKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseNotification {
    pub notification_id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub created_at: String,
}
