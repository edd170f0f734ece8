//! Bearer Token Extraction
//!
//! Parses `Authorization: Bearer <token>` (RFC 6750). The token itself is
//! treated as an opaque string.

use http::{HeaderMap, header};

/// Why no bearer token could be read from a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Malformed Authorization header")]
    Malformed,
}

/// Extract the bearer token from request headers
///
/// The scheme is matched case-insensitively. Exactly one token must follow.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    parse_bearer(value)
}

/// Parse a raw `Authorization` header value
pub fn parse_bearer(value: &str) -> Result<&str, BearerError> {
    let (scheme, rest) = value
        .trim()
        .split_once(' ')
        .ok_or(BearerError::Malformed)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::Malformed);
    }

    let token = rest.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(BearerError::Malformed);
    }

    Ok(token)
}
