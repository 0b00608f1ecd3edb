use chrono::NaiveDate;
use sqlx::SqliteExecutor;

use crate::models::{
    Course, CourseNotification, Enrollment, Instructor, Module, NewModuleRequest,
    NewUserRequest, NotificationKind, UpdateCourseRequest, User,
};

pub async fn fetch_courses(db: impl SqliteExecutor<'_>) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT course_id, course_name, description, instructor_id, start_date, end_date,
               duration_weeks, enrollment_count, created_at, updated_at
        FROM courses
        ORDER BY start_date DESC, course_id DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_course_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT course_id, course_name, description, instructor_id, start_date, end_date,
               duration_weeks, enrollment_count, created_at, updated_at
        FROM courses
        WHERE course_id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn course_exists(db: impl SqliteExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT course_id FROM courses WHERE course_id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub struct CourseRow<'a> {
    pub course_name: &'a str,
    pub description: &'a str,
    pub instructor_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_weeks: Option<i64>,
}

pub async fn insert_course(
    db: impl SqliteExecutor<'_>,
    row: CourseRow<'_>,
    now: &str,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses
            (course_name, description, instructor_id, start_date, end_date,
            duration_weeks, enrollment_count, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
        RETURNING course_id, course_name, description, instructor_id, start_date, end_date,
                  duration_weeks, enrollment_count, created_at, updated_at
        "#,
    )
    .bind(row.course_name)
    .bind(row.description)
    .bind(row.instructor_id)
    .bind(row.start_date)
    .bind(row.end_date)
    .bind(row.duration_weeks)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await
}

pub async fn update_course(
    db: impl SqliteExecutor<'_>,
    id: i64,
    req: &UpdateCourseRequest,
    duration_weeks: Option<i64>,
    now: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses
        SET course_name = ?,
            description = ?,
            instructor_id = ?,
            start_date = ?,
            end_date = ?,
            duration_weeks = ?,
            updated_at = ?
        WHERE course_id = ?
        RETURNING course_id, course_name, description, instructor_id, start_date, end_date,
                  duration_weeks, enrollment_count, created_at, updated_at
        "#,
    )
    .bind(&req.course_name)
    .bind(&req.description)
    .bind(req.instructor_id)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(duration_weeks)
    .bind(now)
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete_course(db: impl SqliteExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE course_id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn increment_enrollment_count(
    db: impl SqliteExecutor<'_>,
    course_id: i64,
    now: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET enrollment_count = enrollment_count + 1, updated_at = ? WHERE course_id = ?",
    )
    .bind(now)
    .bind(course_id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn fetch_users(db: impl SqliteExecutor<'_>) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, email, first_name, last_name, is_active, created_at, updated_at
        FROM users
        ORDER BY user_id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn user_exists(db: impl SqliteExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT user_id FROM users WHERE user_id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn insert_user(
    db: impl SqliteExecutor<'_>,
    req: &NewUserRequest,
    now: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users
            (username, email, first_name, last_name, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING user_id, username, email, first_name, last_name, is_active, created_at, updated_at
        "#,
    )
    .bind(&req.username)
    .bind(&req.email)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(req.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await
}

pub async fn fetch_active_user_ids(db: impl SqliteExecutor<'_>) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM users WHERE is_active = 1 ORDER BY user_id")
        .fetch_all(db)
        .await
}

pub async fn fetch_instructors(db: impl SqliteExecutor<'_>) -> Result<Vec<Instructor>, sqlx::Error> {
    sqlx::query_as::<_, Instructor>(
        r#"
        SELECT u.user_id, u.first_name, u.last_name
        FROM users u
        JOIN user_roles ur ON ur.user_id = u.user_id
        JOIN roles r ON r.role_id = ur.role_id
        WHERE r.role_name = 'instructor'
        ORDER BY u.last_name, u.first_name, u.user_id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_role_id(
    db: impl SqliteExecutor<'_>,
    role_name: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT role_id FROM roles WHERE role_name = ?")
        .bind(role_name)
        .fetch_optional(db)
        .await
}

pub async fn insert_role(db: impl SqliteExecutor<'_>, role_name: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("INSERT INTO roles (role_name) VALUES (?) RETURNING role_id")
        .bind(role_name)
        .fetch_one(db)
        .await
}

/// Idempotent: granting a role twice leaves a single mapping.
pub async fn grant_role(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
    role_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(role_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn insert_notification(
    db: impl SqliteExecutor<'_>,
    course_id: i64,
    user_id: i64,
    kind: NotificationKind,
    now: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO course_notifications (course_id, user_id, kind, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(course_id)
    .bind(user_id)
    .bind(kind)
    .bind(now)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn fetch_notifications_for_user(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
) -> Result<Vec<CourseNotification>, sqlx::Error> {
    sqlx::query_as::<_, CourseNotification>(
        r#"
        SELECT notification_id, course_id, user_id, kind, created_at
        FROM course_notifications
        WHERE user_id = ?
        ORDER BY notification_id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_modules(
    db: impl SqliteExecutor<'_>,
    course_id: i64,
) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        r#"
        SELECT module_id, course_id, title, description, position, created_at
        FROM modules
        WHERE course_id = ?
        ORDER BY position, module_id
        "#,
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn insert_module(
    db: impl SqliteExecutor<'_>,
    course_id: i64,
    req: &NewModuleRequest,
    now: &str,
) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        r#"
        INSERT INTO modules (course_id, title, description, position, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING module_id, course_id, title, description, position, created_at
        "#,
    )
    .bind(course_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.position)
    .bind(now)
    .fetch_one(db)
    .await
}

pub async fn insert_enrollment(
    db: impl SqliteExecutor<'_>,
    course_id: i64,
    user_id: i64,
    now: &str,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        INSERT INTO course_enrollments (user_id, course_id, enrolled_at)
        VALUES (?, ?, ?)
        RETURNING enrollment_id, user_id, course_id, enrolled_at
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(now)
    .fetch_one(db)
    .await
}
