//! Avatar Use Cases

use crate::application::context::AuthContext;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{UserId, avatar::Avatar};
use crate::error::{AuthError, AuthResult};

pub struct AvatarUseCase<R> {
    ctx: AuthContext<R>,
}

impl<R: AuthStore> AvatarUseCase<R> {
    pub fn new(ctx: AuthContext<R>) -> Self {
        Self { ctx }
    }

    /// Validate and store `bytes` as the user's avatar
    pub async fn upload(&self, user_id: &UserId, bytes: Vec<u8>) -> AuthResult<()> {
        let avatar = Avatar::new(bytes)?;
        if !self.ctx.repo.set_avatar(user_id, Some(&avatar)).await? {
            return Err(AuthError::NotFound);
        }

        tracing::info!(%user_id, format = ?avatar.format(), "Avatar uploaded");
        Ok(())
    }

    /// `AuthError::NotFound` if there is no avatar to remove
    pub async fn remove(&self, user_id: &UserId) -> AuthResult<()> {
        if self.ctx.repo.find_avatar(user_id).await?.is_none() {
            return Err(AuthError::NotFound);
        }
        self.ctx.repo.set_avatar(user_id, None).await?;

        tracing::info!(%user_id, "Avatar removed");
        Ok(())
    }

    /// `AuthError::NotFound` if the user or the avatar is missing
    pub async fn fetch(&self, user_id: &UserId) -> AuthResult<Avatar> {
        self.ctx
            .repo
            .find_avatar(user_id)
            .await?
            .ok_or(AuthError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::domain::value_object::avatar::AvatarFormat;
    use crate::infra::memory::InMemoryAuthStore;
    use crate::test_support::{PNG_BYTES, seed_user};

    #[tokio::test]
    async fn test_upload_fetch_remove() {
        let store = InMemoryAuthStore::new();
        let user = seed_user(&store, "jess@example.com").await;
        let ctx = AuthContext::new(store, AuthConfig::with_random_secret()).unwrap();
        let avatars = AvatarUseCase::new(ctx);

        assert!(matches!(
            avatars.fetch(&user.user_id).await,
            Err(AuthError::NotFound)
        ));

        avatars.upload(&user.user_id, PNG_BYTES.to_vec()).await.unwrap();
        let avatar = avatars.fetch(&user.user_id).await.unwrap();
        assert_eq!(avatar.format(), AvatarFormat::Png);
        assert_eq!(avatar.bytes(), PNG_BYTES);

        avatars.remove(&user.user_id).await.unwrap();
        assert!(avatars.fetch(&user.user_id).await.is_err());
        assert!(matches!(
            avatars.remove(&user.user_id).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let store = InMemoryAuthStore::new();
        let user = seed_user(&store, "jess@example.com").await;
        let ctx = AuthContext::new(store, AuthConfig::with_random_secret()).unwrap();

        let result = AvatarUseCase::new(ctx)
            .upload(&user.user_id, b"%PDF-1.7".to_vec())
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }
}
