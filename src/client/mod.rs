pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, Response};
use thiserror::Error;

use crate::models::Instructor;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-success status; `message` is the server's error message when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The course endpoints the edit workflow talks to.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn get_course(&self, course_id: i64) -> Result<dto::CourseRecord, ClientError>;
    async fn list_instructors(&self) -> Result<Vec<Instructor>, ClientError>;
    async fn notify_update(&self, course_id: i64) -> Result<(), ClientError>;
    async fn update_course(
        &self,
        course_id: i64,
        payload: &dto::CoursePayload,
    ) -> Result<(), ClientError>;
}

pub struct HttpCourseApi {
    client: Client,
    base_url: String,
}

impl HttpCourseApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<dto::ErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    };
    tracing::debug!("request failed with {}: {}", status, message);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn get_course(&self, course_id: i64) -> Result<dto::CourseRecord, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/courses/{}", course_id)))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn list_instructors(&self) -> Result<Vec<Instructor>, ClientError> {
        let response = self.client.get(self.url("/api/instructors")).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn notify_update(&self, course_id: i64) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/api/courses/update-notify"))
            .json(&dto::NotifyRequest { course_id })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update_course(
        &self,
        course_id: i64,
        payload: &dto::CoursePayload,
    ) -> Result<(), ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/api/courses/{}", course_id)))
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
