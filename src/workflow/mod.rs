//! Client-side controller for editing a course.
//!
//! [`CourseEditor::load`] fetches the course and the instructor list together;
//! a failed load yields no editor. The end date is only ever derived from the
//! start date and the duration. [`CourseEditor::submit`] notifies first and
//! updates second, in two independent requests.

pub mod dates;

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::dto::CoursePayload;
use crate::client::{ClientError, CourseApi};
use crate::models::Instructor;

pub use dates::{DATE_FORMAT, derive_end_date, parse_duration};

/// Role of the user driving the form. Decides where navigation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Admin,
    Hr,
    Instructor,
    Learner,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Hr => "hr",
            UserType::Instructor => "instructor",
            UserType::Learner => "learner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub user_type: UserType,
    pub notice: Option<String>,
}

impl Navigation {
    pub fn path(&self) -> String {
        format!("/{}/courses", self.user_type.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Description,
    StartDate,
    EndDate,
    Instructor,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequiredField::Title => "title",
            RequiredField::Description => "description",
            RequiredField::StartDate => "start date",
            RequiredField::EndDate => "end date",
            RequiredField::Instructor => "instructor",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("Failed to load course data")]
pub struct LoadError(#[source] pub ClientError);

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please fill in all fields")]
    MissingFields(Vec<RequiredField>),

    /// The notify request failed; the update was not attempted.
    #[error("{0}")]
    NotifyFailed(String),

    /// The update failed after users were already notified of it.
    #[error("{0}")]
    UpdateFailedAfterNotify(String),

    #[error("An error occurred while updating the course")]
    Network {
        notified: bool,
        #[source]
        source: ClientError,
    },
}

impl SubmitError {
    /// Whether an update notice went out for a change that was not stored.
    pub fn notification_sent(&self) -> bool {
        match self {
            SubmitError::UpdateFailedAfterNotify(_) => true,
            SubmitError::Network { notified, .. } => *notified,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub instructor_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub duration: String,
}

#[derive(Debug, Clone)]
pub struct CourseEditor {
    course_id: i64,
    user_type: UserType,
    form: CourseForm,
    instructors: Vec<Instructor>,
    dates_edited: bool,
}

impl CourseEditor {
    pub async fn load(
        api: &dyn CourseApi,
        course_id: i64,
        user_type: UserType,
    ) -> Result<Self, LoadError> {
        let (course, instructors) =
            tokio::try_join!(api.get_course(course_id), api.list_instructors()).map_err(|e| {
                warn!("failed to load course {}: {}", course_id, e);
                LoadError(e)
            })?;

        let start_date = course.start_date.unwrap_or_default();
        let duration = course
            .duration_weeks
            .map(|weeks| weeks.to_string())
            .unwrap_or_default();
        // a stored end date passes through; a missing one is derived
        let end_date = match course.end_date {
            Some(end) if !end.is_empty() => end,
            _ => derive_end_date(&start_date, course.duration_weeks),
        };

        debug!(
            "loaded course {} with {} instructors",
            course_id,
            instructors.len()
        );
        Ok(Self {
            course_id,
            user_type,
            form: CourseForm {
                title: course.course_name,
                description: course.description,
                instructor_id: course.instructor_id,
                start_date,
                end_date,
                duration,
            },
            instructors,
            dates_edited: false,
        })
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    pub fn form(&self) -> &CourseForm {
        &self.form
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    pub fn end_date(&self) -> &str {
        &self.form.end_date
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    pub fn select_instructor(&mut self, instructor_id: Option<i64>) {
        self.form.instructor_id = instructor_id;
    }

    pub fn change_start_date(&mut self, start_date: impl Into<String>) {
        self.form.start_date = start_date.into();
        self.rederive_end_date();
    }

    pub fn change_duration(&mut self, duration: impl Into<String>) {
        self.form.duration = duration.into();
        self.rederive_end_date();
    }

    fn rederive_end_date(&mut self) {
        self.dates_edited = true;
        self.form.end_date =
            derive_end_date(&self.form.start_date, parse_duration(&self.form.duration));
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let form = &self.form;
        let mut missing = Vec::new();
        if form.title.is_empty() {
            missing.push(RequiredField::Title);
        }
        if form.description.is_empty() {
            missing.push(RequiredField::Description);
        }
        if form.start_date.is_empty() {
            missing.push(RequiredField::StartDate);
        }
        if form.end_date.is_empty() {
            missing.push(RequiredField::EndDate);
        }
        if form.instructor_id.is_none() {
            missing.push(RequiredField::Instructor);
        }
        missing
    }

    /// Request body for the update. Duration is only sent once the dates were
    /// edited here, so an untouched form resubmits the loaded end date as-is.
    pub fn payload(&self) -> Result<CoursePayload, SubmitError> {
        let missing = self.missing_fields();
        let instructor_id = match self.form.instructor_id {
            Some(id) if missing.is_empty() => id,
            _ => return Err(SubmitError::MissingFields(missing)),
        };

        let duration_weeks = if self.dates_edited {
            parse_duration(&self.form.duration).filter(|weeks| *weeks > 0)
        } else {
            None
        };

        Ok(CoursePayload {
            course_name: self.form.title.clone(),
            description: self.form.description.clone(),
            start_date: self.form.start_date.clone(),
            end_date: self.form.end_date.clone(),
            instructor_id,
            duration_weeks,
        })
    }

    pub async fn submit(&self, api: &dyn CourseApi) -> Result<Navigation, SubmitError> {
        let payload = self.payload()?;

        match api.notify_update(self.course_id).await {
            Ok(()) => debug!("update notice sent for course {}", self.course_id),
            Err(ClientError::Status { message, .. }) => {
                return Err(SubmitError::NotifyFailed(message));
            }
            Err(source) => {
                return Err(SubmitError::Network {
                    notified: false,
                    source,
                });
            }
        }

        match api.update_course(self.course_id, &payload).await {
            Ok(()) => {
                info!("course {} updated", self.course_id);
                Ok(Navigation {
                    user_type: self.user_type,
                    notice: Some("Course updated successfully".to_string()),
                })
            }
            Err(ClientError::Status { message, .. }) => {
                warn!(
                    "course {} update failed after users were notified: {}",
                    self.course_id, message
                );
                Err(SubmitError::UpdateFailedAfterNotify(message))
            }
            Err(source) => {
                warn!(
                    "course {} update failed after users were notified: {}",
                    self.course_id, source
                );
                Err(SubmitError::Network {
                    notified: true,
                    source,
                })
            }
        }
    }

    /// Drops the edits and leaves the page.
    pub fn cancel(self) -> Navigation {
        Navigation {
            user_type: self.user_type,
            notice: None,
        }
    }
}
