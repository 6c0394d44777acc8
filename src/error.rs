//! Error types for the deduplication engine.
//!
//! Uses `thiserror` for typed library errors rather than `anyhow`, so
//! callers can match on failure cases and react to each one.

use thiserror::Error;

use crate::types::resource::{ResourceId, ResourceKind};

/// Errors that can occur during scanning, near-match resolution, merging,
/// or job dispatch.
#[derive(Debug, Error)]
pub enum DedupeError {
    /// A store call failed. Wraps whatever the backing store returned.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The near-match candidate set exceeds the configured ceiling. The
    /// caller should narrow the filter and retry.
    #[error("near-match candidate set has {count} values, limit is {limit}")]
    TooManyCandidates { count: usize, limit: usize },

    /// The keeper of a merge request does not exist.
    #[error("merge keeper {id} not found")]
    KeepMissing { id: ResourceId },

    /// A reference rewrite failed mid-merge. The merge aborts before any
    /// deletion, so re-dispatching it resumes where this one stopped.
    #[error("reference rewrite failed on {kind} {id}")]
    RewriteFailed {
        kind: ResourceKind,
        id: ResourceId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The operation was cancelled before it finished.
    #[error("operation cancelled")]
    Cancelled,

    /// The job runner refused or failed to accept a dispatch.
    #[error("job dispatch failed: {0}")]
    JobDispatch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DedupeError {
    /// Wrap an arbitrary failure from a backing store.
    pub fn store(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Store(err.into())
    }

    /// Wrap a dispatch failure from a job runner.
    pub fn dispatch(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::JobDispatch(err.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DedupeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_render_their_source() {
        let err = DedupeError::store("connection reset");
        assert_eq!(err.to_string(), "store error: connection reset");
    }

    #[test]
    fn rewrite_failure_names_the_resource() {
        let err = DedupeError::RewriteFailed {
            kind: ResourceKind::Item,
            id: ResourceId(42),
            source: "disk full".into(),
        };
        assert_eq!(err.to_string(), "reference rewrite failed on item 42");
    }
}
