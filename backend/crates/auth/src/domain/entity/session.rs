//! Session Entity
//!
//! One entry in a user's token set. Only the SHA-256 digest of the token is
//! kept; the token string itself is handed to the client once and never
//! stored.

use chrono::{DateTime, Utc};
use platform::crypto::{constant_time_eq, sha256};

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenDigest([u8; 32]);

impl TokenDigest {
    pub fn of(token: &str) -> Self {
        Self(sha256(token.as_bytes()))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Constant-time equality
    pub fn matches(&self, other: &TokenDigest) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for TokenDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenDigest([REDACTED])")
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub digest: TokenDigest,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn for_token(token: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            digest: TokenDigest::of(token),
            issued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_matches_same_token_only() {
        let a = TokenDigest::of("header.payload.sig");
        assert!(a.matches(&TokenDigest::of("header.payload.sig")));
        assert!(!a.matches(&TokenDigest::of("header.payload.sih")));
    }
}
