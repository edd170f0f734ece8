//! Domain Layer

pub mod entity;
pub mod list_query;
pub mod repository;

// Re-exports
pub use entity::post::{NewPost, Post};
pub use list_query::{ListQuery, SortBy, SortField, SortOrder};
pub use repository::{PostRepository, PostStore};
