//! List Posts Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::post::Post;
use crate::domain::list_query::ListQuery;
use crate::domain::repository::PostStore;
use crate::error::PostResult;

pub struct ListPostsUseCase<S> {
    store: Arc<S>,
}

impl<S: PostStore> ListPostsUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, owner: &UserId, query: &ListQuery) -> PostResult<Vec<Post>> {
        let posts = self.store.list_owned(owner, query).await?;
        tracing::debug!(owner = %owner, count = posts.len(), "Posts listed");
        Ok(posts)
    }
}
