//! Application Layer
//!
//! Post use cases. Reads, updates and deletes are scoped to the requester
//! through `auth::OwnershipAuthorizer`.

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

// Re-exports
pub use create::CreatePostUseCase;
pub use delete::DeletePostUseCase;
pub use get::GetPostUseCase;
pub use list::ListPostsUseCase;
pub use update::UpdatePostUseCase;
