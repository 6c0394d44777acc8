//! Collaborator contracts the engine is built against.

pub mod notifier;
pub mod runner;
pub mod search;
pub mod store;

pub use notifier::{Notifier, TracingNotifier};
pub use runner::{JobHandle, JobId, JobRequest, JobRunner, JobState, JobStatus};
pub use search::Search;
pub use store::{LiteralRow, ResourceStore, ValueStore};
