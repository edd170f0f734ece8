//! Delete Account Use Case
//!
//! Order matters: sessions are revoked first so no request can act as the
//! user while its resources are being purged, then owned resources go, then
//! the user itself.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::application::identity::Identity;
use crate::domain::entity::user::User;
use crate::domain::repository::{AccountNotifier, AuthStore, OwnedResourcePurger};
use crate::error::AuthResult;

pub struct DeleteAccountUseCase<R, P, N> {
    ctx: AuthContext<R>,
    purger: Arc<P>,
    notifier: Arc<N>,
}

impl<R, P, N> DeleteAccountUseCase<R, P, N>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync,
    N: AccountNotifier + Send + Sync,
{
    pub fn new(ctx: AuthContext<R>, purger: Arc<P>, notifier: Arc<N>) -> Self {
        Self {
            ctx,
            purger,
            notifier,
        }
    }

    /// Returns the deleted user
    pub async fn execute(&self, identity: &Identity) -> AuthResult<User> {
        let user = identity.user.as_ref().clone();
        let user_id = &user.user_id;

        let revoked = self.ctx.tokens.revoke_all(user_id).await?;
        let purged = self.purger.delete_all_owned_by(user_id).await?;
        self.ctx.repo.delete(user_id).await?;

        if let Err(e) = self.notifier.farewell(&user.email, user.name.as_str()).await {
            tracing::warn!(%user_id, error = %e, "Farewell notification failed");
        }

        tracing::info!(%user_id, revoked, purged, "Account deleted");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::UserId;
    use crate::infra::memory::InMemoryAuthStore;
    use crate::test_support::{RecordingNotifier, seed_user};
    use tokio::sync::Mutex;

    /// Records who was purged and whether their sessions were already gone
    struct CheckingPurger {
        store: InMemoryAuthStore,
        calls: Mutex<Vec<(UserId, u64)>>,
    }

    impl OwnedResourcePurger for CheckingPurger {
        async fn delete_all_owned_by(&self, owner: &UserId) -> AuthResult<u64> {
            use crate::domain::repository::SessionRepository;
            let live = self.store.count(owner).await?;
            self.calls.lock().await.push((*owner, live));
            Ok(3)
        }
    }

    #[tokio::test]
    async fn test_cascade() {
        let store = InMemoryAuthStore::new();
        let user = seed_user(&store, "jess@example.com").await;
        let ctx = AuthContext::new(store.clone(), AuthConfig::with_random_secret()).unwrap();
        let purger = Arc::new(CheckingPurger {
            store: store.clone(),
            calls: Mutex::new(Vec::new()),
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let use_case =
            DeleteAccountUseCase::new(ctx.clone(), Arc::clone(&purger), Arc::clone(&notifier));

        let token = ctx.tokens.issue(&user.user_id).await.unwrap();
        let identity = ctx.identity_resolver().resolve_token(&token).await.unwrap();

        let deleted = use_case.execute(&identity).await.unwrap();
        assert_eq!(deleted.user_id, user.user_id);

        // Purged once, after every session was revoked
        assert_eq!(*purger.calls.lock().await, [(user.user_id, 0)]);
        assert!(ctx.repo.find_by_id(&user.user_id).await.unwrap().is_none());
        assert!(ctx.identity_resolver().resolve_token(&token).await.is_err());
        assert_eq!(notifier.farewelled().await, ["jess@example.com"]);
    }
}
