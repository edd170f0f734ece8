//! Get Post Use Case

use auth::OwnershipAuthorizer;
use kernel::id::{PostId, UserId};

use crate::domain::entity::post::Post;
use crate::domain::repository::PostStore;
use crate::error::PostResult;

pub struct GetPostUseCase<S> {
    authorizer: OwnershipAuthorizer<S>,
}

impl<S: PostStore> GetPostUseCase<S> {
    pub fn new(authorizer: OwnershipAuthorizer<S>) -> Self {
        Self { authorizer }
    }

    /// `PostError::NotFound` for missing and foreign posts alike
    pub async fn execute(&self, requester: &UserId, post_id: &PostId) -> PostResult<Post> {
        Ok(self
            .authorizer
            .authorize_read(requester, post_id)
            .await?
            .into_result()?)
    }
}
