//! Create Post Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::post::{NewPost, Post};
use crate::domain::repository::PostStore;
use crate::error::PostResult;

pub struct CreatePostUseCase<S> {
    store: Arc<S>,
}

impl<S: PostStore> CreatePostUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The post always belongs to `owner`, whatever the request body said
    pub async fn execute(&self, owner: &UserId, new: NewPost) -> PostResult<Post> {
        let post = Post::create(*owner, new)?;
        self.store.create(&post).await?;

        tracing::info!(post_id = %post.post_id, owner = %owner, "Post created");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PostError;
    use crate::infra::memory::InMemoryPostStore;
    use crate::test_support::new_post;
    use auth::OwnedResourceStore;

    #[tokio::test]
    async fn test_create_stores_under_owner() {
        let store = Arc::new(InMemoryPostStore::new());
        let owner = UserId::new();

        let post = CreatePostUseCase::new(store.clone())
            .execute(&owner, new_post("Bandung"))
            .await
            .unwrap();

        assert_eq!(post.owner(), &owner);
        assert_eq!(
            store.find_owned(&post.post_id, &owner).await.unwrap(),
            Some(post)
        );
    }

    #[tokio::test]
    async fn test_invalid_post_not_stored() {
        let store = Arc::new(InMemoryPostStore::new());
        let owner = UserId::new();
        let mut new = new_post("Bandung");
        new.description = String::new();

        let result = CreatePostUseCase::new(store.clone()).execute(&owner, new).await;
        assert!(matches!(result, Err(PostError::Validation(_))));
    }
}
