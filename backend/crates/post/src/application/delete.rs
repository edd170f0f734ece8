//! Delete Post Use Case

use auth::OwnershipAuthorizer;
use kernel::id::{PostId, UserId};

use crate::domain::entity::post::Post;
use crate::domain::repository::PostStore;
use crate::error::PostResult;

pub struct DeletePostUseCase<S> {
    authorizer: OwnershipAuthorizer<S>,
}

impl<S: PostStore> DeletePostUseCase<S> {
    pub fn new(authorizer: OwnershipAuthorizer<S>) -> Self {
        Self { authorizer }
    }

    /// Returns the removed post
    pub async fn execute(&self, requester: &UserId, post_id: &PostId) -> PostResult<Post> {
        let post = self
            .authorizer
            .authorize_delete(requester, post_id)
            .await?
            .into_result()?;

        tracing::info!(post_id = %post.post_id, owner = %requester, "Post deleted");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::{CreatePostUseCase, GetPostUseCase};
    use crate::error::PostError;
    use crate::infra::memory::InMemoryPostStore;
    use crate::test_support::new_post;

    #[tokio::test]
    async fn test_only_owner_can_read_or_delete() {
        let store = Arc::new(InMemoryPostStore::new());
        let authorizer = OwnershipAuthorizer::new(store.clone());
        let owner = UserId::new();
        let stranger = UserId::new();

        let post = CreatePostUseCase::new(store)
            .execute(&owner, new_post("Bandung"))
            .await
            .unwrap();
        let get = GetPostUseCase::new(authorizer.clone());
        let delete = DeletePostUseCase::new(authorizer);

        assert!(matches!(
            get.execute(&stranger, &post.post_id).await,
            Err(PostError::NotFound)
        ));
        assert!(matches!(
            delete.execute(&stranger, &post.post_id).await,
            Err(PostError::NotFound)
        ));
        assert_eq!(get.execute(&owner, &post.post_id).await.unwrap(), post);

        delete.execute(&owner, &post.post_id).await.unwrap();
        assert!(matches!(
            get.execute(&owner, &post.post_id).await,
            Err(PostError::NotFound)
        ));
        assert!(matches!(
            delete.execute(&owner, &post.post_id).await,
            Err(PostError::NotFound)
        ));
    }
}
