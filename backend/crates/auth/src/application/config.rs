//! Application Configuration
//!
//! Configuration for the Auth application layer, read from the environment
//! at startup.

use std::fmt;

use platform::password::{DEFAULT_MIN_PASSWORD_LENGTH, PasswordPolicy};
use rand::RngCore;

use crate::error::{AuthError, AuthResult};

/// Signing secrets shorter than this are accepted with a warning
const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 key for session tokens (`JWT_SECRET`)
    pub jwt_secret: Vec<u8>,
    /// Rules for new passwords (`PASSWORD_MIN_LENGTH`)
    pub password_policy: PasswordPolicy,
    /// Password pepper (optional, application-wide secret, `PASSWORD_PEPPER`)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> AuthResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.is_empty() {
            return Err(AuthError::Config("JWT_SECRET must not be empty".into()));
        }
        if jwt_secret.len() < RECOMMENDED_SECRET_BYTES {
            tracing::warn!(
                len = jwt_secret.len(),
                "JWT_SECRET is shorter than {RECOMMENDED_SECRET_BYTES} bytes"
            );
        }

        Ok(Self {
            jwt_secret,
            password_policy: PasswordPolicy::default(),
            password_pepper: None,
        })
    }

    /// Load from process environment variables
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AuthResult<Self> {
        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| AuthError::Config("JWT_SECRET is not set".into()))?;
        let mut config = Self::new(secret)?;

        if let Some(raw) = lookup("PASSWORD_MIN_LENGTH") {
            let min_length = raw.trim().parse::<usize>().map_err(|_| {
                AuthError::Config(format!("PASSWORD_MIN_LENGTH is not a number: {raw:?}"))
            })?;
            if min_length == 0 {
                return Err(AuthError::Config(
                    "PASSWORD_MIN_LENGTH must be at least 1".into(),
                ));
            }
            config.password_policy = PasswordPolicy::new(min_length);
        }

        config.password_pepper = lookup("PASSWORD_PEPPER")
            .filter(|p| !p.is_empty())
            .map(String::into_bytes);

        Ok(config)
    }

    /// Create config with a random signing secret (for development and tests)
    pub fn with_random_secret() -> Self {
        let mut secret = vec![0u8; RECOMMENDED_SECRET_BYTES];
        rand::rng().fill_bytes(&mut secret);
        Self {
            jwt_secret: secret,
            password_policy: PasswordPolicy::new(DEFAULT_MIN_PASSWORD_LENGTH),
            password_pepper: None,
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("password_policy", &self.password_policy)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = AuthConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(AuthError::Config(_))));

        let result = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "")]));
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let config =
            AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "thisisasecretformyapp")])).unwrap();
        assert_eq!(config.password_policy.min_length, DEFAULT_MIN_PASSWORD_LENGTH);
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "thisisasecretformyapp"),
            ("PASSWORD_MIN_LENGTH", "12"),
            ("PASSWORD_PEPPER", "pepper"),
        ]))
        .unwrap();
        assert_eq!(config.password_policy.min_length, 12);
        assert_eq!(config.pepper(), Some(&b"pepper"[..]));
    }

    #[test]
    fn test_bad_min_length() {
        for raw in ["seven", "0", "-1"] {
            let result = AuthConfig::from_lookup(lookup(&[
                ("JWT_SECRET", "thisisasecretformyapp"),
                ("PASSWORD_MIN_LENGTH", raw),
            ]));
            assert!(matches!(result, Err(AuthError::Config(_))), "{raw}");
        }
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig::new("super-secret-signing-key").unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
