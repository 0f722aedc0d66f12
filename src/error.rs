use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::client::{ApiError, GENERIC_ERROR_MESSAGE};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Request conflicts with the current state of the resource
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Backend(Arc<ApiError>),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Backend(Arc::new(err))
    }
}

impl From<Arc<ApiError>> for AppError {
    fn from(err: Arc<ApiError>) -> Self {
        AppError::Backend(err)
    }
}

impl AppError {
    /// Message safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Backend(e) => e.user_message(),
            other => {
                let message = other.to_string();
                if message.is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Backend(e) => match e.as_ref() {
                ApiError::Status { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                ApiError::Transport(_) | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Backend(e) if self.status_code().is_server_error() => {
                tracing::error!(error = %e, "Backend failure");
            }
            AppError::Unauthorized(_) | AppError::Forbidden(_) => {
                tracing::info!(error = %self, "Authorization error");
            }
            _ => tracing::debug!(error = %self, "Client error"),
        }

        HttpResponse::build(self.status_code()).json(json!({
            "detail": self.user_message()
        }))
    }
}
