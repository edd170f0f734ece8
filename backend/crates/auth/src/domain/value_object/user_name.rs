//! User Name Value Object
//!
//! The display name shown on a profile. Not an identifier: two accounts may
//! share a name.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a display name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 100;

/// NFKC-normalized, trimmed, non-empty display name
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let name = normalized.trim();

        if name.is_empty() {
            return Err(AppError::bad_request("Name is required"));
        }

        if name.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {USER_NAME_MAX_LENGTH} characters"
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
