//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod notifier;
pub mod postgres;

pub use memory::InMemoryAuthStore;
pub use notifier::TracingNotifier;
pub use postgres::PgAuthRepository;
