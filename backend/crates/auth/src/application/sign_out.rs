//! Sign Out Use Case
//!
//! Revokes the presented session, or every session of the caller.

use crate::application::context::AuthContext;
use crate::application::identity::Identity;
use crate::domain::repository::AuthStore;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<R> {
    ctx: AuthContext<R>,
}

impl<R: AuthStore> SignOutUseCase<R> {
    pub fn new(ctx: AuthContext<R>) -> Self {
        Self { ctx }
    }

    /// Sign out from the current session only
    pub async fn execute(&self, identity: &Identity) -> AuthResult<()> {
        let user_id = &identity.user.user_id;
        self.ctx.tokens.revoke(user_id, &identity.token).await?;

        tracing::info!(%user_id, "User signed out");
        Ok(())
    }

    /// Sign out from all sessions, the current one included
    pub async fn execute_all(&self, identity: &Identity) -> AuthResult<u64> {
        let user_id = &identity.user.user_id;
        let revoked = self.ctx.tokens.revoke_all(user_id).await?;

        tracing::info!(%user_id, revoked, "User signed out from all sessions");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::infra::memory::InMemoryAuthStore;
    use crate::test_support::seed_user;

    #[tokio::test]
    async fn test_logout_and_logout_all() {
        let store = InMemoryAuthStore::new();
        let user = seed_user(&store, "jess@example.com").await;
        let ctx = AuthContext::new(store, AuthConfig::with_random_secret()).unwrap();
        let resolver = ctx.identity_resolver();
        let use_case = SignOutUseCase::new(ctx.clone());

        let a = ctx.tokens.issue(&user.user_id).await.unwrap();
        let b = ctx.tokens.issue(&user.user_id).await.unwrap();
        let c = ctx.tokens.issue(&user.user_id).await.unwrap();

        let identity = resolver.resolve_token(&a).await.unwrap();
        use_case.execute(&identity).await.unwrap();
        assert!(resolver.resolve_token(&a).await.is_err());
        assert!(resolver.resolve_token(&b).await.is_ok());

        let identity = resolver.resolve_token(&b).await.unwrap();
        assert_eq!(use_case.execute_all(&identity).await.unwrap(), 2);
        assert!(resolver.resolve_token(&b).await.is_err());
        assert!(resolver.resolve_token(&c).await.is_err());

        let d = ctx.tokens.issue(&user.user_id).await.unwrap();
        assert_eq!(resolver.resolve_token(&d).await.unwrap().user.user_id, user.user_id);
    }
}
