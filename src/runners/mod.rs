//! Job runner implementations.

mod tokio;

pub use self::tokio::TokioJobRunner;
