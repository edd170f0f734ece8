//! Shared Kernel
//!
//! Vocabulary shared by every bounded context of the backend:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - Typed identifiers ([`id::UserId`], [`id::PostId`])
//!
//! Keep this crate small. Anything that only one context needs belongs in
//! that context's crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
