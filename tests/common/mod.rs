#![allow(dead_code)]

use std::str::FromStr;

use chrono::NaiveDate;
use lms_backend::db::MIGRATOR;
use lms_backend::models::{Course, NewCourseRequest, NewUserRequest, User};
use lms_backend::services::{CourseService, UserService};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Migrated in-memory database. A single connection keeps every query on the
/// same database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Failed to parse database url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create database");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

pub async fn seed_user(pool: &SqlitePool, username: &str, is_active: bool) -> User {
    UserService::new(pool.clone())
        .create_user(NewUserRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            is_active,
        })
        .await
        .expect("Failed to create user")
}

pub async fn seed_instructor(pool: &SqlitePool, username: &str) -> User {
    let user = seed_user(pool, username, true).await;
    UserService::new(pool.clone())
        .grant_role(user.user_id, "instructor")
        .await
        .expect("Failed to grant instructor role");
    user
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad test date")
}

pub async fn seed_course(pool: &SqlitePool, instructor_id: i64, start: &str, weeks: i64) -> Course {
    CourseService::new(pool.clone())
        .create_course(NewCourseRequest {
            course_name: "Rust Basics".to_string(),
            description: "Ownership and borrowing".to_string(),
            instructor_id,
            start_date: date(start),
            end_date: None,
            duration_weeks: Some(weeks),
        })
        .await
        .expect("Failed to create course")
}

pub async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
