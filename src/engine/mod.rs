//! The deduplication engine.
//!
//! - [`GroupScanner`] finds resources sharing a normalized literal value.
//! - [`skip_set`]/[`deletion_set`] decide what is safe to delete.
//! - [`NearMatchResolver`] finds values similar to an input value.
//! - [`MergeExecutor`] folds a resource set into one keeper, rewriting
//!   references.
//! - [`BatchScheduler`] runs deletions inline or hands them to a job runner.
//! - [`Deduplicator`] ties all of it together behind one entry point.

mod deduplicator;
mod merge;
mod near_match;
mod scanner;
mod scheduler;
mod skip;

pub use deduplicator::Deduplicator;
pub use merge::MergeExecutor;
pub use near_match::NearMatchResolver;
pub use scanner::GroupScanner;
pub use scheduler::BatchScheduler;
pub use skip::{deletion_set, skip_set};
