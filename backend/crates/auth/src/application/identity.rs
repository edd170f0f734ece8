//! Identity Resolver
//!
//! Turns a request's `Authorization` header into the acting user.
//!
//! ```text
//! header ──► bearer token ──► signature + session set ──► user lookup ──► Identity
//!    │             │                    │                      │
//!    └─────────────┴──────── any failure ───────────────────────┴──► Unauthenticated
//! ```
//!
//! Callers only ever see `Unauthenticated`; the actual reason is logged at
//! debug level. Store outages are not authentication failures and surface as
//! internal errors.

use std::sync::Arc;

use http::HeaderMap;
use platform::bearer::{BearerError, extract_bearer};

use crate::application::session_token::SessionTokenManager;
use crate::domain::entity::user::User;
use crate::domain::repository::AuthStore;
use crate::error::{AuthError, AuthResult};

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: Arc<User>,
    /// The exact token presented, needed for single-session logout
    pub token: Arc<str>,
}

/// Why a request was not authenticated. Only ever logged.
#[derive(Debug)]
enum Rejection {
    MissingHeader,
    MalformedHeader,
    BadToken,
    UnknownUser,
}

pub struct IdentityResolver<R> {
    repo: Arc<R>,
    tokens: Arc<SessionTokenManager<R>>,
}

impl<R> Clone for IdentityResolver<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<R: AuthStore> IdentityResolver<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<SessionTokenManager<R>>) -> Self {
        Self { repo, tokens }
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> AuthResult<Identity> {
        let token = extract_bearer(headers).map_err(|e| {
            reject(match e {
                BearerError::Missing => Rejection::MissingHeader,
                BearerError::Malformed => Rejection::MalformedHeader,
            })
        })?;

        self.resolve_token(token).await
    }

    pub async fn resolve_token(&self, token: &str) -> AuthResult<Identity> {
        let user_id = match self.tokens.verify(token).await {
            Ok(user_id) => user_id,
            Err(AuthError::InvalidToken) => return Err(reject(Rejection::BadToken)),
            Err(e) => return Err(e),
        };

        // Token still listed but the account is gone (deleted concurrently)
        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| reject(Rejection::UnknownUser))?;

        Ok(Identity {
            user: Arc::new(user),
            token: Arc::from(token),
        })
    }
}

fn reject(reason: Rejection) -> AuthError {
    tracing::debug!(?reason, "Request not authenticated");
    AuthError::Unauthenticated
}
