//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPostStore;
pub use postgres::PgPostRepository;
