mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{count, seed_course, seed_instructor, seed_user, test_pool};
use lms_backend::api::router;
use lms_backend::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let pool = test_pool().await;
    let app = router(AppState { db: pool });

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_course_shape() {
    let pool = test_pool().await;
    let instructor = seed_instructor(&pool, "ada").await;
    let course = seed_course(&pool, instructor.user_id, "2025-01-02", 4).await;
    let app = router(AppState { db: pool });

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/courses/{}", course.course_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course_name"], "Rust Basics");
    assert_eq!(body["description"], "Ownership and borrowing");
    assert_eq!(body["instructor_id"], instructor.user_id);
    assert_eq!(body["start_date"], "2025-01-02");
    assert_eq!(body["end_date"], "2025-01-30");
    assert_eq!(body["duration_weeks"], 4);

    let (status, body) = send(&app, Method::GET, "/api/courses/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn test_instructor_listing() {
    let pool = test_pool().await;
    let instructor = seed_instructor(&pool, "ada").await;
    seed_user(&pool, "bob", true).await;
    let app = router(AppState { db: pool });

    let (status, body) = send(&app, Method::GET, "/api/instructors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "user_id": instructor.user_id, "first_name": "ada", "last_name": "Tester" }])
    );
}

#[tokio::test]
async fn test_update_notify_route_is_not_a_course_id() {
    let pool = test_pool().await;
    let instructor = seed_instructor(&pool, "ada").await;
    let course = seed_course(&pool, instructor.user_id, "2025-01-02", 4).await;
    let app = router(AppState { db: pool.clone() });

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courses/update-notify",
        Some(json!({ "course_id": course.course_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notified"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courses/update-notify",
        Some(json!({ "course_id": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let updated = count(
        &pool,
        "SELECT COUNT(*) FROM course_notifications WHERE kind = 'updated'",
    )
    .await;
    assert_eq!(updated, 1);
}

#[tokio::test]
async fn test_put_course_errors_carry_message() {
    let pool = test_pool().await;
    let instructor = seed_instructor(&pool, "ada").await;
    let course = seed_course(&pool, instructor.user_id, "2025-01-02", 4).await;
    let app = router(AppState { db: pool });
    let uri = format!("/api/courses/{}", course.course_id);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "course_name": "Rust Basics",
            "description": "Ownership",
            "start_date": "2025-01-10",
            "end_date": "2025-01-02",
            "instructor_id": instructor.user_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "end_date must not be before start_date");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "course_name": "Rust in Depth",
            "description": "Ownership",
            "start_date": "2025-01-02",
            "end_date": "2025-01-30",
            "instructor_id": instructor.user_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course_name"], "Rust in Depth");
}

#[tokio::test]
async fn test_create_course_user_and_module_endpoints() {
    let pool = test_pool().await;
    let app = router(AppState { db: pool });

    let (status, user) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({
            "username": "ada",
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["is_active"], true);
    let user_id = user["user_id"].as_i64().expect("user id");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/users/{}/roles", user_id),
        Some(json!({ "role_name": "Instructor" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, course) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(json!({
            "course_name": "Rust Basics",
            "description": "Ownership",
            "instructor_id": user_id,
            "start_date": "2025-01-02",
            "duration_weeks": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(course["end_date"], "2025-01-16");
    let course_id = course["course_id"].as_i64().expect("course id");

    let (status, notes) = send(
        &app,
        Method::GET,
        &format!("/api/users/{}/notifications", user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes[0]["course_id"], course_id);
    assert_eq!(notes[0]["kind"], "created");

    for (title, position) in [("Second", 2), ("First", 1)] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/courses/{}/modules", course_id),
            Some(json!({ "title": title, "position": position })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, modules) = send(
        &app,
        Method::GET,
        &format!("/api/courses/{}/modules", course_id),
        None,
    )
    .await;
    assert_eq!(modules[0]["title"], "First");
    assert_eq!(modules[1]["title"], "Second");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{}/enrollments", course_id),
        Some(json!({ "user_id": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{}/enrollments", course_id),
        Some(json!({ "user_id": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], format!("User {} is already enrolled", user_id));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/courses/{}", course_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, courses) = send(&app, Method::GET, "/api/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(courses, json!([]));
}
