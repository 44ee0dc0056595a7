use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// A required upload is absent. The message is the prompt shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingInput {
    #[error("Please upload a Job Description first!")]
    JobDescription,

    #[error("Please upload resumes and a job description!")]
    Resumes,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    MissingInput(#[from] MissingInput),

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Session(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::MissingInput(missing) => ("MISSING_INPUT", missing.to_string()),
            AppError::Multipart(e) => {
                tracing::warn!("Rejected multipart body: {e}");
                ("INVALID_UPLOAD", e.body_text())
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Session(e) => {
                tracing::error!("Session error: {e}");
                ("SESSION_ERROR", "Your session could not be loaded".to_string())
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                ("RENDER_ERROR", "The page could not be rendered".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}
