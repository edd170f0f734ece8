//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    session::Session,
    user::{ProfileChanges, User},
};
pub use repository::{
    AccountNotifier, AuthStore, OwnedResourcePurger, OwnedResourceStore, SessionRepository,
    UserRepository,
};
