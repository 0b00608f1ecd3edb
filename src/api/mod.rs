use axum::Json;
use axum::extract::Path;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::{CourseService, UserService};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/update-notify", post(notify_course_update))
        .route(
            "/api/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/api/courses/{id}/modules", get(list_modules).post(create_module))
        .route("/api/courses/{id}/enrollments", post(enroll_user))
        .route("/api/instructors", get(list_instructors))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}/roles", post(grant_role))
        .route("/api/users/{id}/notifications", get(list_notifications))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::new(state.db.clone()).create_course(req).await?;
    Ok(Json(course))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = repository::find_course_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::new(state.db.clone()).update_course(id, req).await?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    CourseService::new(state.db.clone()).delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn notify_course_update(
    State(state): State<AppState>,
    Json(req): Json<UpdateNotifyRequest>,
) -> Result<Json<UpdateNotifyResponse>, AppError> {
    let response = CourseService::new(state.db.clone())
        .notify_update(req.course_id)
        .await?;
    Ok(Json(response))
}

async fn list_modules(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Module>>, AppError> {
    if !repository::course_exists(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    let modules = repository::fetch_modules(&state.db, id).await?;
    Ok(Json(modules))
}

async fn create_module(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewModuleRequest>,
) -> Result<Json<Module>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }
    if !repository::course_exists(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    let now = chrono::Utc::now().to_rfc3339();
    let module = repository::insert_module(&state.db, id, &req, &now).await?;
    Ok(Json(module))
}

async fn enroll_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = CourseService::new(state.db.clone())
        .enroll(id, req.user_id)
        .await?;
    Ok(Json(enrollment))
}

async fn list_instructors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Instructor>>, AppError> {
    let instructors = repository::fetch_instructors(&state.db).await?;
    Ok(Json(instructors))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = repository::fetch_users(&state.db).await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUserRequest>,
) -> Result<Json<User>, AppError> {
    let user = UserService::new(state.db.clone()).create_user(req).await?;
    Ok(Json(user))
}

async fn grant_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<GrantRoleRequest>,
) -> Result<StatusCode, AppError> {
    UserService::new(state.db.clone())
        .grant_role(id, &req.role_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_notifications(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CourseNotification>>, AppError> {
    if !repository::user_exists(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    let notifications = repository::fetch_notifications_for_user(&state.db, id).await?;
    Ok(Json(notifications))
}
