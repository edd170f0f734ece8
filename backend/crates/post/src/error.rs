//! Post Error Types

use auth::AuthError;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type PostResult<T> = Result<T, PostError>;

#[derive(Debug, Error)]
pub enum PostError {
    /// Missing or malformed post fields, bad list query
    #[error("{0}")]
    Validation(String),

    /// Absent, or owned by someone else
    #[error("Not found")]
    NotFound,

    /// Patch requested fields outside the allow-list
    #[error("Invalid updates")]
    InvalidField(Vec<String>),

    /// Anything else raised by the auth layer
    #[error(transparent)]
    Auth(AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostError::Validation(_) | PostError::InvalidField(_) => ErrorKind::BadRequest,
            PostError::NotFound => ErrorKind::NotFound,
            PostError::Auth(e) => e.kind(),
            PostError::Database(_) | PostError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            PostError::InvalidField(fields) => {
                AppError::new(self.kind(), self.to_string()).with_details(fields.iter().cloned())
            }
            PostError::Auth(e) => e.to_app_error(),
            PostError::Database(_) | PostError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            PostError::Database(e) => tracing::error!(error = %e, "Post database error"),
            PostError::Internal(msg) => tracing::error!(message = %msg, "Post internal error"),
            _ => tracing::debug!(error = %self, "Post error"),
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        match self {
            // Keeps the auth layer's own logging and headers
            PostError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}

impl From<AuthError> for PostError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFound => PostError::NotFound,
            AuthError::InvalidField(fields) => PostError::InvalidField(fields),
            AuthError::Validation(msg) => PostError::Validation(msg),
            other => PostError::Auth(other),
        }
    }
}
