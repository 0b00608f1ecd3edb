use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewUserRequest, User};
use crate::services::course_service::require_text;

pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, req: NewUserRequest) -> Result<User, AppError> {
        require_text("username", &req.username)?;
        require_text("email", &req.email)?;
        require_text("first_name", &req.first_name)?;
        require_text("last_name", &req.last_name)?;
        if !req.email.contains('@') {
            return Err(AppError::BadRequest("email is not valid".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let user = repository::insert_user(&self.db, &req, &now)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict("Username or email already taken".to_string())
                }
                other => other,
            })?;
        info!("Created user {} ({})", user.user_id, user.username);
        Ok(user)
    }

    /// Grants a role by name, creating the role on first use.
    pub async fn grant_role(&self, user_id: i64, role_name: &str) -> Result<(), AppError> {
        require_text("role_name", role_name)?;
        let role_name = role_name.trim().to_lowercase();

        let mut tx = self.db.begin().await?;
        if !repository::user_exists(&mut *tx, user_id).await? {
            return Err(AppError::NotFound);
        }
        let role_id = match repository::find_role_id(&mut *tx, &role_name).await? {
            Some(id) => id,
            None => repository::insert_role(&mut *tx, &role_name).await?,
        };
        repository::grant_role(&mut *tx, user_id, role_id).await?;
        tx.commit().await?;

        info!("Granted role {} to user {}", role_name, user_id);
        Ok(())
    }
}
