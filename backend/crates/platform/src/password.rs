//! Password Hashing and Verification
//!
//! - Argon2id hashing with a random per-hash salt (PHC string format)
//! - Zeroization of clear text on drop
//! - Constant-time verification (inside argon2)
//! - The baseline password policy: minimum length, no bare "password"

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::random_token;

// ============================================================================
// Constants
// ============================================================================

/// Default minimum password length, in characters
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 7;

/// Maximum password length, in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Passwords equal to this (trimmed, any case) are always rejected
const FORBIDDEN_PASSWORD: &str = "password";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password cannot be \"password\"")]
    Forbidden,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Policy
// ============================================================================

/// Rules a clear text password must satisfy before it is hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password, erased from memory when dropped
///
/// Not `Clone`, and `Debug` output is redacted.
///
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordPolicy};
///
/// let password = ClearTextPassword::new("ahmadthariq".to_string(), &PasswordPolicy::default()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate `raw` against `policy`.
    ///
    /// Unicode is NFKC-normalized first; lengths count code points.
    pub fn new(raw: String, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count < policy.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: policy.min_length,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if trimmed.eq_ignore_ascii_case(FORBIDDEN_PASSWORD) {
            return Err(PasswordPolicyError::Forbidden);
        }

        Ok(Self(normalized))
    }

    /// Random password nobody knows. Used to build decoy hashes.
    pub fn generate() -> Self {
        Self(random_token(32))
    }

    /// Wrap without policy checks, for verifying login attempts.
    ///
    /// Login input must not be policy-checked: a policy change would
    /// otherwise lock out users whose existing passwords no longer comply.
    pub fn unchecked(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> zeroize::Zeroizing<Vec<u8>> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        zeroize::Zeroizing::new(bytes)
    }

    /// Hash with Argon2id and a fresh random salt.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = self.peppered(pepper);
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format (algorithm, params, salt, digest)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time check of `password` against this hash.
    ///
    /// `pepper` must match the one used at hash time.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        let password_bytes = password.peppered(pepper);
        Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string(), &policy());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::TooShort { min: 7, actual: 5 })
        ));
    }

    #[test]
    fn test_min_length_is_configurable() {
        let strict = PasswordPolicy::new(12);
        assert!(ClearTextPassword::new("ahmadthariq".to_string(), &strict).is_err());
        assert!(ClearTextPassword::new("ahmadthariq!".to_string(), &strict).is_ok());
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let result = ClearTextPassword::new(long_password, &policy());
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("          ".to_string(), &policy());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_literal_rejected() {
        for candidate in ["password", "PASSWORD", " Password "] {
            let result = ClearTextPassword::new(candidate.to_string(), &policy());
            assert!(
                matches!(result, Err(PasswordPolicyError::Forbidden)),
                "{candidate:?} should be rejected"
            );
        }
        // Only the bare word is forbidden.
        assert!(ClearTextPassword::new("password1".to_string(), &policy()).is_ok());
    }

    #[test]
    fn test_control_characters_rejected() {
        let result = ClearTextPassword::new("abc\u{0007}defgh".to_string(), &policy());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_unicode_password_counts_code_points() {
        // 6 code points, 18 bytes
        let result = ClearTextPassword::new("パスワード安".to_string(), &policy());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::TooShort { actual: 6, .. })
        ));
        assert!(ClearTextPassword::new("パスワード安全".to_string(), &policy()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("ahmadthariq".to_string(), &policy()).unwrap();
        let hashed = password.hash(None).unwrap();
        assert!(hashed.verify(&password, None));

        let wrong = ClearTextPassword::unchecked("thariqsyauqi".to_string());
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_same_password_hashes_differ() {
        let password = ClearTextPassword::unchecked("ahmadthariq".to_string());
        let a = password.hash(None).unwrap();
        let b = password.hash(None).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
        assert!(a.verify(&password, None));
        assert!(b.verify(&password, None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::unchecked("ahmadthariq".to_string());
        let pepper = b"server-side-pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"other-pepper")));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::unchecked("ahmadthariq".to_string());
        let hashed = password.hash(None).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password, None));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_generated_passwords_are_distinct() {
        let a = ClearTextPassword::generate();
        let hashed = a.hash(None).unwrap();
        let b = ClearTextPassword::generate();
        assert!(!hashed.verify(&b, None));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::unchecked("secret-value".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret-value"));

        let hashed = password.hash(None).unwrap();
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }
}
