use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::repository::{self, CourseRow};
use crate::error::AppError;
use crate::models::{
    Course, Enrollment, NewCourseRequest, NotificationKind, UpdateCourseRequest,
    UpdateNotifyResponse, end_date_for, weeks_between,
};

pub struct CourseService {
    db: SqlitePool,
}

impl CourseService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts the course and one `created` notification per active user in a
    /// single transaction. Any failed insert rolls the whole creation back.
    pub async fn create_course(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        require_text("course_name", &req.course_name)?;
        require_text("description", &req.description)?;
        let end_date = resolve_end_date(req.start_date, req.end_date, req.duration_weeks)?;
        self.require_instructor(req.instructor_id).await?;

        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.begin().await?;

        let course = repository::insert_course(
            &mut *tx,
            CourseRow {
                course_name: &req.course_name,
                description: &req.description,
                instructor_id: req.instructor_id,
                start_date: req.start_date,
                end_date,
                duration_weeks: req
                    .duration_weeks
                    .or_else(|| weeks_between(req.start_date, end_date)),
            },
            &now,
        )
        .await?;

        let recipients = repository::fetch_active_user_ids(&mut *tx).await?;
        for user_id in &recipients {
            repository::insert_notification(
                &mut *tx,
                course.course_id,
                *user_id,
                NotificationKind::Created,
                &now,
            )
            .await?;
        }

        tx.commit().await?;
        info!(
            "Created course {} and notified {} active users",
            course.course_id,
            recipients.len()
        );
        Ok(course)
    }

    /// Records one `updated` notification per active user for an existing course.
    ///
    /// Independent of [`CourseService::update_course`]; callers that notify and
    /// then update do so in two separate round-trips.
    pub async fn notify_update(&self, course_id: i64) -> Result<UpdateNotifyResponse, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.begin().await?;

        if !repository::course_exists(&mut *tx, course_id).await? {
            return Err(AppError::NotFound);
        }

        let recipients = repository::fetch_active_user_ids(&mut *tx).await?;
        for user_id in &recipients {
            repository::insert_notification(
                &mut *tx,
                course_id,
                *user_id,
                NotificationKind::Updated,
                &now,
            )
            .await?;
        }

        tx.commit().await?;
        info!("Update notice for course {} sent to {} users", course_id, recipients.len());
        Ok(UpdateNotifyResponse {
            course_id,
            notified: recipients.len() as u64,
        })
    }

    pub async fn update_course(
        &self,
        id: i64,
        req: UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        require_text("course_name", &req.course_name)?;
        require_text("description", &req.description)?;
        resolve_end_date(req.start_date, Some(req.end_date), req.duration_weeks)?;
        self.require_instructor(req.instructor_id).await?;

        // stored duration always agrees with the stored dates
        let duration_weeks = req
            .duration_weeks
            .or_else(|| weeks_between(req.start_date, req.end_date));

        let now = Utc::now().to_rfc3339();
        let course = repository::update_course(&self.db, id, &req, duration_weeks, &now)
            .await?
            .ok_or(AppError::NotFound)?;
        debug!("Updated course {}", id);
        Ok(course)
    }

    pub async fn delete_course(&self, id: i64) -> Result<(), AppError> {
        if repository::delete_course(&self.db, id).await? {
            info!("Deleted course {}", id);
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    /// Enrolls a user and bumps the course's enrollment counter atomically.
    pub async fn enroll(&self, course_id: i64, user_id: i64) -> Result<Enrollment, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.begin().await?;

        if !repository::course_exists(&mut *tx, course_id).await? {
            return Err(AppError::NotFound);
        }
        if !repository::user_exists(&mut *tx, user_id).await? {
            return Err(AppError::BadRequest(format!("User {} does not exist", user_id)));
        }

        let enrollment = repository::insert_enrollment(&mut *tx, course_id, user_id, &now)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("User {} is already enrolled", user_id))
                }
                other => other,
            })?;
        repository::increment_enrollment_count(&mut *tx, course_id, &now).await?;

        tx.commit().await?;
        Ok(enrollment)
    }

    async fn require_instructor(&self, instructor_id: i64) -> Result<(), AppError> {
        if repository::user_exists(&self.db, instructor_id).await? {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Instructor {} does not exist",
                instructor_id
            )))
        }
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::BadRequest(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

/// Picks the stored end date. A submitted duration is authoritative: an end
/// date sent alongside it must equal the derived one.
fn resolve_end_date(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    duration_weeks: Option<i64>,
) -> Result<NaiveDate, AppError> {
    let derived = match duration_weeks {
        Some(weeks) => Some(end_date_for(start_date, weeks).ok_or_else(|| {
            AppError::BadRequest("duration_weeks must be a positive number of weeks".to_string())
        })?),
        None => None,
    };

    let end_date = match (end_date, derived) {
        (Some(given), Some(derived)) if given != derived => {
            return Err(AppError::BadRequest(format!(
                "end_date {} does not match start_date plus duration_weeks ({})",
                given, derived
            )));
        }
        (Some(given), _) => given,
        (None, Some(derived)) => derived,
        (None, None) => {
            return Err(AppError::BadRequest(
                "end_date or duration_weeks is required".to_string(),
            ));
        }
    };

    if end_date < start_date {
        return Err(AppError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(end_date)
}
