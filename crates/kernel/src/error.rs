//! Application error types.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::services::importer::ImportError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    /// No signed-in user could be resolved for the call.
    ///
    /// Rendered exactly like [`AppError::NotFound`] so that anonymous callers
    /// cannot tell a protected route from a missing one.
    #[error("not found")]
    Unauthenticated,

    #[error("unprocessable entity: {0}")]
    MalformedRequest(String),

    /// The request body could not be read, e.g. it exceeds the body limit.
    #[error(transparent)]
    Body(#[from] BytesRejection),

    #[error("quota reached")]
    QuotaExceeded,

    #[error("failed to apply dashboard defaults")]
    Normalization(#[source] anyhow::Error),

    #[error("failed to import dashboard")]
    Import(#[from] ImportError),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::Unauthenticated => StatusCode::NOT_FOUND,
            AppError::MalformedRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Body(rejection) => rejection.status(),
            AppError::QuotaExceeded => StatusCode::FORBIDDEN,
            AppError::Normalization(_) | AppError::Import(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Caller errors get a generic message; internal causes stay in the log
        let body = match &self {
            AppError::MalformedRequest(detail) => {
                tracing::debug!(detail = %detail, "rejected malformed import request");
                "unprocessable entity".to_string()
            }
            AppError::Normalization(e) => {
                tracing::error!(error = ?e, "failed to apply dashboard defaults");
                "internal server error".to_string()
            }
            AppError::Body(rejection) => {
                tracing::debug!(error = %rejection, "failed to read import request body");
                rejection.body_text()
            }
            AppError::Import(e) => {
                tracing::error!(error = ?e, "dashboard import failed");
                "internal server error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "internal server error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
