//! Application Layer
//!
//! Use cases and application services.

pub mod avatar;
pub mod config;
pub mod context;
pub mod credential_store;
pub mod delete_account;
pub mod identity;
pub mod ownership;
pub mod profile;
pub mod session_token;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use avatar::AvatarUseCase;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use credential_store::CredentialStore;
pub use delete_account::DeleteAccountUseCase;
pub use identity::{Identity, IdentityResolver};
pub use ownership::{Access, FieldPolicy, OwnershipAuthorizer, authorize_fields};
pub use profile::{GetProfileUseCase, UpdateProfileUseCase};
pub use session_token::{SessionTokenManager, TokenSigner};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
