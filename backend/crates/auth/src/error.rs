//! Auth Error Types
//!
//! Auth-specific error variants, mapped onto the unified
//! `kernel::error::AppError` at the HTTP boundary.

use axum::response::{IntoResponse, Response};
use http::{HeaderValue, header};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password rejected by the password policy
    #[error("Weak password: {0}")]
    WeakCredential(String),

    /// Login failed; unknown email and wrong password are indistinguishable
    #[error("Unable to login")]
    InvalidCredentials,

    /// Token is malformed, badly signed, or revoked
    #[error("Invalid session token")]
    InvalidToken,

    /// No usable token was presented
    #[error("Please authenticate")]
    Unauthenticated,

    /// Absent, or owned by someone else
    #[error("Not found")]
    NotFound,

    /// Patch requested fields outside the allow-list
    #[error("Invalid updates")]
    InvalidField(Vec<String>),

    /// Email already registered
    #[error("Email is already registered")]
    EmailTaken,

    /// Malformed input (email, name, profile fields)
    #[error("{0}")]
    Validation(String),

    /// Missing or unusable configuration; fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::WeakCredential(_)
            | AuthError::InvalidCredentials
            | AuthError::InvalidField(_)
            | AuthError::EmailTaken
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidToken | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::Config(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError. Server-side details never reach the client.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::InvalidField(fields) => {
                AppError::new(self.kind(), self.to_string()).with_details(fields.iter().cloned())
            }
            AuthError::InvalidToken => AppError::new(self.kind(), "Please authenticate"),
            AuthError::Config(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) | AuthError::Config(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidField(fields) => {
                tracing::debug!(?fields, "Rejected update with disallowed fields");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let challenge = matches!(self.kind(), ErrorKind::Unauthorized);
        let mut response = self.to_app_error().into_response();
        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::WeakCredential(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::InvalidCredentials.kind().status_code(), 400);
        assert_eq!(AuthError::WeakCredential("x".into()).kind().status_code(), 400);
        assert_eq!(AuthError::InvalidField(vec![]).kind().status_code(), 400);
        assert_eq!(AuthError::EmailTaken.kind().status_code(), 400);
        assert_eq!(AuthError::InvalidToken.kind().status_code(), 401);
        assert_eq!(AuthError::Unauthenticated.kind().status_code(), 401);
        assert_eq!(AuthError::NotFound.kind().status_code(), 404);
        assert_eq!(AuthError::Internal("x".into()).kind().status_code(), 500);
    }

    #[test]
    fn test_invalid_token_looks_like_unauthenticated() {
        let a = AuthError::InvalidToken.to_app_error();
        let b = AuthError::Unauthenticated.to_app_error();
        assert_eq!(a.status_code(), b.status_code());
        assert_eq!(a.message(), b.message());
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AuthError::Internal("connection string leaked".into()).to_app_error();
        assert!(!err.message().contains("leaked"));
    }

    #[test]
    fn test_invalid_field_lists_fields() {
        let err = AuthError::InvalidField(vec!["owner".into()]).to_app_error();
        assert_eq!(err.details(), ["owner"]);
    }

    #[test]
    fn test_unauthorized_response_carries_challenge() {
        let response = AuthError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
