use axum::http::StatusCode;
use axum::response::IntoResponse;
use lms_backend::error::{AppError, ErrorResponse};

async fn render(err: AppError) -> (StatusCode, ErrorResponse) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Failed to parse error body");
    (status, body)
}

#[tokio::test]
async fn test_error_variants_map_to_status_and_message() {
    let (status, body) = render(AppError::NotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.message, "Not Found");

    let (status, body) = render(AppError::BadRequest("title is required".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.message, "title is required");
    assert_eq!(body.error, "400 Bad Request");

    let (status, body) = render(AppError::Conflict("taken".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.message, "taken");

    let (status, body) = render(AppError::Database(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.message, "Database error occurred");
}

#[test]
fn test_non_constraint_sqlx_errors_stay_database_errors() {
    let err = AppError::from(sqlx::Error::RowNotFound);
    assert!(matches!(err, AppError::Database(_)));
}
