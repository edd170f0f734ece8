//! Post Backend Module
//!
//! Trip posts owned by users. Every route requires a bearer token resolved
//! by `auth::require_identity`, and every read, update and delete is scoped
//! to the requester: someone else's post answers 404, same as a missing one.
//!
//! The store also serves as the auth crate's `OwnedResourcePurger`, so
//! deleting an account deletes its posts.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use domain::repository::PostStore;
pub use error::{PostError, PostResult};
pub use infra::{InMemoryPostStore, PgPostRepository};
pub use presentation::post_router_generic;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};

    use crate::domain::entity::post::NewPost;

    pub fn new_post(destination: &str) -> NewPost {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        NewPost {
            destination: destination.to_string(),
            start,
            finish: start + Duration::days(2),
            person: 2,
            route: "Jakarta - Bandung".into(),
            description: "Weekend trip".into(),
            completed: false,
        }
    }
}
