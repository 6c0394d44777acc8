//! Duplicate Detection and Merge Engine
//!
//! A library for finding structured records ("resources") that carry equal,
//! case-insensitively equal, or phonetically/edit-distance-similar literal
//! values on a chosen property, deleting the redundant copies safely, and
//! merging an operator-chosen resource set into one keeper while rewriting
//! every reference that pointed at the discarded resources.
//!
//! # Design
//!
//! - The engine owns the algorithms, never the data: storage, search, and
//!   background execution are injected behind [`traits`].
//! - Scans are read-only, single-snapshot computations; the explicit merge
//!   is the only operation that mutates many resources, and it always runs
//!   as a background job.
//! - Ambiguous duplicates (non-keep members of more than one group) are
//!   never deleted automatically; they are reported instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dedupe::{Deduplicator, MemoryStore, ResourceKind, ScanConfig, TokioJobRunner};
//!
//! let store = Arc::new(MemoryStore::new());
//! let runner = Arc::new(TokioJobRunner::new(store.clone()));
//! let engine = Deduplicator::new(store, runner);
//!
//! // Find and delete case-insensitive title duplicates.
//! let outcome = engine
//!     .dedupe(&ScanConfig::new(ResourceKind::Item, title).case_insensitive())
//!     .await?;
//!
//! // Merge items 11 and 12 into item 10, rewriting references.
//! let handle = engine
//!     .merge(MergeRequest::new(ResourceKind::Item, 10u64, merged))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`engine`] - scanner, skip detection, near-match resolution, merge,
//!   scheduling, and the [`Deduplicator`] facade
//! - [`traits`] - collaborator contracts (ValueStore, Search, JobRunner, Notifier)
//! - [`types`] - resource model, requests, tuning, outcomes
//! - [`similarity`] - string-similarity and phonetic primitives
//! - [`stores`] - storage implementations (MemoryStore, PostgresStore)
//! - [`runners`] - job runner implementations (TokioJobRunner)
//! - [`testing`] - recording mocks and store fixtures

pub mod engine;
pub mod error;
pub mod runners;
pub mod similarity;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{DedupeError, Result};
pub use traits::{
    notifier::{Notifier, TracingNotifier},
    runner::{JobHandle, JobId, JobRequest, JobRunner, JobState, JobStatus},
    search::Search,
    store::{LiteralRow, ResourceStore, ValueStore},
};
pub use types::{
    config::{
        DedupeConfig, MatchMode, MergeRequest, NearMatchConfig, ResourceFilter, ScanConfig,
        ScannerConfig, SchedulerConfig, SimilarityMethod,
    },
    report::{DedupeAction, DedupeOutcome, DeleteOutcome, DuplicateGroup, MergeOutcome, ScanReport},
    resource::{PropertyId, Resource, ResourceId, ResourceKind, Value, ValueData},
};

// Re-export the engine components
pub use engine::{
    deletion_set, skip_set, BatchScheduler, Deduplicator, GroupScanner, MergeExecutor,
    NearMatchResolver,
};

// Re-export stores and runners
pub use runners::TokioJobRunner;
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
