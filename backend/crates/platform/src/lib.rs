//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Password hashing (Argon2id) and the baseline password policy
//! - Cryptographic helpers (SHA-256, random bytes, constant-time compare)
//! - `Authorization: Bearer` header parsing

pub mod bearer;
pub mod crypto;
pub mod password;
