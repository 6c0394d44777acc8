//! Storage implementations.

mod memory;

pub use memory::MemoryStore;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
