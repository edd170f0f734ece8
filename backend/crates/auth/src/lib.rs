//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Sign up / log in with email + password
//! - Bearer session tokens, revocable one at a time or all at once
//! - Identity middleware for other crates' protected routes
//! - Ownership-scoped access to user-owned resources
//! - Profile updates screened by a field allow-list
//! - Account deletion cascading to owned resources
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional server-side pepper
//! - Unknown email and wrong password are indistinguishable, timing included
//! - Tokens are HS256 JWTs, valid only while listed in the owner's session set
//! - Only token digests are stored
//! - Other users' resources are reported as absent, never as forbidden

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    Access, AuthConfig, AuthContext, FieldPolicy, Identity, IdentityResolver, OwnershipAuthorizer,
    authorize_fields,
};
pub use domain::repository::{AuthStore, OwnedResourcePurger, OwnedResourceStore};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthStore, PgAuthRepository, TracingNotifier};
pub use presentation::{auth_router_generic, require_identity};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::sync::Mutex;

    use platform::password::ClearTextPassword;

    use crate::domain::entity::user::User;
    use crate::domain::repository::{AccountNotifier, UserRepository};
    use crate::domain::value_object::{
        email::Email, user_name::UserName, user_password::UserPassword,
    };
    use crate::error::AuthResult;
    use crate::infra::memory::InMemoryAuthStore;

    pub const SEED_PASSWORD: &str = "red12345!";

    /// Smallest input the avatar check accepts as PNG
    pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    /// Insert a user whose password is [`SEED_PASSWORD`], without sessions
    pub async fn seed_user(store: &InMemoryAuthStore, email: &str) -> User {
        let hashed = ClearTextPassword::unchecked(SEED_PASSWORD.to_string())
            .hash(None)
            .unwrap();
        let user = User::new(
            Email::new(email).unwrap(),
            UserName::new("Jess").unwrap(),
            UserPassword::from_hashed(hashed),
        );
        store.create(&user).await.unwrap();
        user
    }

    #[derive(Default)]
    pub struct RecordingNotifier {
        welcomed: Mutex<Vec<String>>,
        farewelled: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub async fn welcomed(&self) -> Vec<String> {
            self.welcomed.lock().await.clone()
        }

        pub async fn farewelled(&self) -> Vec<String> {
            self.farewelled.lock().await.clone()
        }
    }

    impl AccountNotifier for RecordingNotifier {
        async fn welcome(&self, email: &Email, _name: &str) -> AuthResult<()> {
            self.welcomed.lock().await.push(email.to_string());
            Ok(())
        }

        async fn farewell(&self, email: &Email, _name: &str) -> AuthResult<()> {
            self.farewelled.lock().await.push(email.to_string());
            Ok(())
        }
    }
}
