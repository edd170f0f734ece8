//! User Password Value Object
//!
//! The stored form of a user's password: an Argon2id PHC string produced by
//! `CredentialStore`. There is no way to build one from clear text here, so a
//! `User` can never hold an unhashed password.

use std::fmt;

use platform::password::HashedPassword;

use crate::error::{AuthError, AuthResult};

#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub(crate) fn from_hashed(hashed: HashedPassword) -> Self {
        Self(hashed)
    }

    /// Rebuild from a stored PHC string
    pub fn from_db(phc: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(format!("Corrupt stored password hash: {e}")))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub(crate) fn hashed(&self) -> &HashedPassword {
        &self.0
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}
