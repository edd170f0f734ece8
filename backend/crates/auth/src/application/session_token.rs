//! Session Token Manager
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`), issue time (`iat`)
//! and a random id (`jti`). They have no expiry: a token is good for as long
//! as its digest sits in the owner's session set. Logout removes it, logout
//! everywhere empties the set.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::session::{Session, TokenDigest};
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub jti: String,
}

/// Signs and checks token signatures. Knows nothing about revocation.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::Config("Token signing secret is empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::from(["sub".to_string()]);
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn sign(&self, user_id: &UserId, issued_at: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))
    }

    /// Check the signature and return the user id it was issued to
    pub fn decode(&self, token: &str) -> AuthResult<UserId> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        UserId::parse(&data.claims.sub).map_err(|_| AuthError::InvalidToken)
    }
}

pub struct SessionTokenManager<S> {
    signer: TokenSigner,
    sessions: Arc<S>,
}

impl<S> Clone for SessionTokenManager<S> {
    fn clone(&self) -> Self {
        Self {
            signer: self.signer.clone(),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<S> SessionTokenManager<S>
where
    S: SessionRepository,
{
    pub fn new(secret: &[u8], sessions: Arc<S>) -> AuthResult<Self> {
        Ok(Self {
            signer: TokenSigner::new(secret)?,
            sessions,
        })
    }

    /// Mint a token for `user_id` and add it to the user's session set
    pub async fn issue(&self, user_id: &UserId) -> AuthResult<String> {
        let issued_at = Utc::now();
        let token = self.signer.sign(user_id, issued_at)?;

        self.sessions
            .append(user_id, &Session::for_token(&token, issued_at))
            .await?;

        tracing::debug!(%user_id, "Session issued");
        Ok(token)
    }

    /// Valid signature and still in the owner's session set.
    ///
    /// `AuthError::InvalidToken` otherwise.
    pub async fn verify(&self, token: &str) -> AuthResult<UserId> {
        let user_id = self.signer.decode(token)?;

        if self
            .sessions
            .contains(&user_id, &TokenDigest::of(token))
            .await?
        {
            Ok(user_id)
        } else {
            tracing::debug!(%user_id, "Token not in session set");
            Err(AuthError::InvalidToken)
        }
    }

    /// Remove one token. Removing an absent token is not an error.
    pub async fn revoke(&self, user_id: &UserId, token: &str) -> AuthResult<()> {
        let removed = self
            .sessions
            .remove(user_id, &TokenDigest::of(token))
            .await?;
        tracing::debug!(%user_id, removed, "Session revoked");
        Ok(())
    }

    /// Empty the session set. Returns how many tokens were revoked.
    pub async fn revoke_all(&self, user_id: &UserId) -> AuthResult<u64> {
        let count = self.sessions.clear(user_id).await?;
        tracing::debug!(%user_id, count, "All sessions revoked");
        Ok(count)
    }

    pub async fn active_sessions(&self, user_id: &UserId) -> AuthResult<u64> {
        self.sessions.count(user_id).await
    }
}
