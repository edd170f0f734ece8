//! Repository Traits
//!
//! A post store also implements `auth::OwnedResourceStore` (ownership-scoped
//! get and delete) and `auth::OwnedResourcePurger` (account deletion).

use auth::{OwnedResourcePurger, OwnedResourceStore};
use kernel::id::{PostId, UserId};

use crate::domain::entity::post::Post;
use crate::domain::list_query::ListQuery;
use crate::error::PostResult;

#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Fails with `AuthError::Unauthenticated` if the owner's account is
    /// already gone, so a create racing an account deletion leaves no orphan.
    async fn create(&self, post: &Post) -> PostResult<()>;

    /// Only `owner`'s posts, filtered, sorted and paged per `query`
    async fn list_owned(&self, owner: &UserId, query: &ListQuery) -> PostResult<Vec<Post>>;

    /// Write keyed by `(post_id, owner)`. Returns whether a row matched.
    async fn update_owned(&self, post: &Post) -> PostResult<bool>;
}

/// Everything the post routes need from one store
pub trait PostStore:
    PostRepository
    + OwnedResourceStore<Id = PostId, Resource = Post>
    + OwnedResourcePurger
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> PostStore for T where
    T: PostRepository
        + OwnedResourceStore<Id = PostId, Resource = Post>
        + OwnedResourcePurger
        + Clone
        + Send
        + Sync
        + 'static
{
}
