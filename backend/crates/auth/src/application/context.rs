//! Auth Context
//!
//! The wired-up auth services for one backing store, shared by the router,
//! the identity middleware and other crates' routers.

use std::sync::Arc;

use crate::application::{
    config::AuthConfig, credential_store::CredentialStore, identity::IdentityResolver,
    session_token::SessionTokenManager,
};
use crate::domain::repository::AuthStore;
use crate::error::AuthResult;

pub struct AuthContext<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<SessionTokenManager<R>>,
}

impl<R> Clone for AuthContext<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: Arc::clone(&self.config),
            credentials: Arc::clone(&self.credentials),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<R: AuthStore> AuthContext<R> {
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let repo = Arc::new(repo);
        let credentials = Arc::new(CredentialStore::new(&config)?);
        let tokens = Arc::new(SessionTokenManager::new(
            &config.jwt_secret,
            Arc::clone(&repo),
        )?);

        Ok(Self {
            repo,
            config: Arc::new(config),
            credentials,
            tokens,
        })
    }

    pub fn identity_resolver(&self) -> IdentityResolver<R> {
        IdentityResolver::new(Arc::clone(&self.repo), Arc::clone(&self.tokens))
    }
}
