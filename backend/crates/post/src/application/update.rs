//! Update Post Use Case
//!
//! Only `description` and `completed` may change. The body is screened
//! against [`FieldPolicy::POST`] before anything is looked up.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use auth::{FieldPolicy, OwnershipAuthorizer, authorize_fields};
use kernel::id::{PostId, UserId};

use crate::domain::entity::post::Post;
use crate::domain::repository::PostStore;
use crate::error::{PostError, PostResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PostPatch {
    description: Option<String>,
    completed: Option<bool>,
}

pub struct UpdatePostUseCase<S> {
    authorizer: OwnershipAuthorizer<S>,
    store: Arc<S>,
}

impl<S: PostStore> UpdatePostUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            authorizer: OwnershipAuthorizer::new(store.clone()),
            store,
        }
    }

    pub async fn execute(
        &self,
        requester: &UserId,
        post_id: &PostId,
        patch: Map<String, Value>,
    ) -> PostResult<Post> {
        authorize_fields(&FieldPolicy::POST, &patch)?;

        let patch: PostPatch = serde_json::from_value(Value::Object(patch))
            .map_err(|e| PostError::Validation(format!("Invalid update: {e}")))?;

        let mut post = self
            .authorizer
            .authorize_read(requester, post_id)
            .await?
            .into_result()?;

        if let Some(description) = patch.description {
            post.set_description(&description)?;
        }
        if let Some(completed) = patch.completed {
            post.set_completed(completed);
        }

        // Deleted between the read and the write
        if !self.store.update_owned(&post).await? {
            return Err(PostError::NotFound);
        }

        tracing::info!(post_id = %post.post_id, owner = %requester, "Post updated");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::application::CreatePostUseCase;
    use crate::infra::memory::InMemoryPostStore;
    use crate::test_support::new_post;
    use auth::OwnedResourceStore;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    async fn setup() -> (Arc<InMemoryPostStore>, UserId, Post) {
        let store = Arc::new(InMemoryPostStore::new());
        let owner = UserId::new();
        let post = CreatePostUseCase::new(store.clone())
            .execute(&owner, new_post("Bandung"))
            .await
            .unwrap();
        (store, owner, post)
    }

    #[tokio::test]
    async fn test_owner_updates_allowed_fields() {
        let (store, owner, post) = setup().await;

        let updated = UpdatePostUseCase::new(store.clone())
            .execute(
                &owner,
                &post.post_id,
                patch(json!({ "description": "Rained all weekend", "completed": true })),
            )
            .await
            .unwrap();

        assert!(updated.completed);
        let stored = store.find_owned(&post.post_id, &owner).await.unwrap().unwrap();
        assert_eq!(stored.description, "Rained all weekend");
        assert!(stored.completed);
    }

    #[tokio::test]
    async fn test_disallowed_fields_change_nothing() {
        let (store, owner, post) = setup().await;

        let result = UpdatePostUseCase::new(store.clone())
            .execute(
                &owner,
                &post.post_id,
                patch(json!({ "completed": true, "owner": UserId::new(), "destination": "Bali" })),
            )
            .await;
        assert!(
            matches!(result, Err(PostError::InvalidField(f)) if f == ["destination", "owner"])
        );

        let stored = store.find_owned(&post.post_id, &owner).await.unwrap().unwrap();
        assert_eq!(stored, post);
    }

    #[tokio::test]
    async fn test_foreign_post_is_not_found() {
        let (store, _, post) = setup().await;

        let result = UpdatePostUseCase::new(store)
            .execute(&UserId::new(), &post.post_id, patch(json!({ "completed": true })))
            .await;
        assert!(matches!(result, Err(PostError::NotFound)));
    }

    #[tokio::test]
    async fn test_wrong_type_is_validation_error() {
        let (store, owner, post) = setup().await;

        let result = UpdatePostUseCase::new(store)
            .execute(&owner, &post.post_id, patch(json!({ "completed": "yes" })))
            .await;
        assert!(matches!(result, Err(PostError::Validation(_))));
    }
}
