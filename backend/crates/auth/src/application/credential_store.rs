//! Credential Store
//!
//! The only place clear text passwords are handled. Hashing and
//! verification are CPU-heavy (Argon2id), so they run on tokio's blocking
//! pool.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicy};

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_password::UserPassword;
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub struct CredentialStore {
    policy: PasswordPolicy,
    pepper: Option<Vec<u8>>,
    /// Hash of an unknown random password. Verifying against it costs the
    /// same as a real check, so unknown emails take as long as wrong
    /// passwords.
    decoy: HashedPassword,
}

impl CredentialStore {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let pepper = config.password_pepper.clone();
        let decoy = ClearTextPassword::generate()
            .hash(pepper.as_deref())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(Self {
            policy: config.password_policy,
            pepper,
            decoy,
        })
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Check `raw` against the password policy and hash it.
    ///
    /// `AuthError::WeakCredential` if the policy rejects it.
    pub async fn hash(self: &Arc<Self>, raw: String) -> AuthResult<UserPassword> {
        let password = ClearTextPassword::new(raw, &self.policy)?;
        let this = Arc::clone(self);

        let hashed = tokio::task::spawn_blocking(move || password.hash(this.pepper.as_deref()))
            .await?
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(UserPassword::from_hashed(hashed))
    }

    /// Whether `raw` matches `stored`. Never errors on a mismatch.
    pub async fn verify(self: &Arc<Self>, raw: String, stored: &UserPassword) -> AuthResult<bool> {
        let password = ClearTextPassword::unchecked(raw);
        let stored = stored.hashed().clone();
        let this = Arc::clone(self);

        let matches = tokio::task::spawn_blocking(move || {
            stored.verify(&password, this.pepper.as_deref())
        })
        .await?;

        Ok(matches)
    }

    /// Burn one verification's worth of time for an email with no account
    pub async fn verify_absent(self: &Arc<Self>, raw: String) -> AuthResult<()> {
        let password = ClearTextPassword::unchecked(raw);
        let this = Arc::clone(self);

        tokio::task::spawn_blocking(move || {
            let _ = this.decoy.verify(&password, this.pepper.as_deref());
        })
        .await?;

        Ok(())
    }
}
