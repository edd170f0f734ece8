//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer (and, for owned resources, in the crates that own
//! those resources).

use std::future::Future;

use crate::domain::entity::{
    session::{Session, TokenDigest},
    user::{ProfileChanges, User},
};
use crate::domain::value_object::{UserId, avatar::Avatar, email::Email};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user. `AuthError::EmailTaken` if the email is in use.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Merge `changes` into the stored user and return the result.
    ///
    /// Only the fields `changes` carries are written, so two updates racing
    /// from the same snapshot never undo each other. Never touches the
    /// session set or the avatar. `AuthError::NotFound` if the user is gone,
    /// `AuthError::EmailTaken` if the new email belongs to someone else.
    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> AuthResult<User>;

    /// Remove the user, its avatar and its session set. Returns whether it
    /// existed.
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;

    /// Replace (`Some`) or remove (`None`) the avatar. Returns whether the
    /// user exists.
    async fn set_avatar(&self, user_id: &UserId, avatar: Option<&Avatar>) -> AuthResult<bool>;

    async fn find_avatar(&self, user_id: &UserId) -> AuthResult<Option<Avatar>>;
}

/// Per-user session set
///
/// Each call is a single atomic change to the set, so concurrent logins and
/// logouts never overwrite each other.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn append(&self, user_id: &UserId, session: &Session) -> AuthResult<()>;

    async fn contains(&self, user_id: &UserId, digest: &TokenDigest) -> AuthResult<bool>;

    /// Returns whether the token was present
    async fn remove(&self, user_id: &UserId, digest: &TokenDigest) -> AuthResult<bool>;

    /// Empty the set. Returns how many sessions were dropped.
    async fn clear(&self, user_id: &UserId) -> AuthResult<u64>;

    async fn count(&self, user_id: &UserId) -> AuthResult<u64>;
}

/// Everything the auth layer needs from one backing store
pub trait AuthStore: UserRepository + SessionRepository + Clone + Send + Sync + 'static {}

impl<T> AuthStore for T where T: UserRepository + SessionRepository + Clone + Send + Sync + 'static {}

/// Storage for resources that belong to exactly one user
///
/// Every lookup is keyed by `(id, owner)`, so a resource owned by someone
/// else is indistinguishable from one that does not exist.
///
/// Written out by hand rather than through `trait_variant` because of the
/// associated types.
pub trait OwnedResourceStore: Send + Sync {
    type Id: Send + Sync;
    type Resource: Send;

    fn find_owned(
        &self,
        id: &Self::Id,
        owner: &UserId,
    ) -> impl Future<Output = AuthResult<Option<Self::Resource>>> + Send;

    /// Delete and return the resource, if `owner` owns it
    fn delete_owned(
        &self,
        id: &Self::Id,
        owner: &UserId,
    ) -> impl Future<Output = AuthResult<Option<Self::Resource>>> + Send;
}

/// Deletes every resource a user owns; run when the account is deleted
#[trait_variant::make(OwnedResourcePurger: Send)]
pub trait LocalOwnedResourcePurger {
    /// Returns how many resources were removed
    async fn delete_all_owned_by(&self, owner: &UserId) -> AuthResult<u64>;
}

/// Account lifecycle notifications (welcome / farewell emails)
#[trait_variant::make(AccountNotifier: Send)]
pub trait LocalAccountNotifier {
    async fn welcome(&self, email: &Email, name: &str) -> AuthResult<()>;

    async fn farewell(&self, email: &Email, name: &str) -> AuthResult<()>;
}
