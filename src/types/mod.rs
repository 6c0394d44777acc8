//! Core data types: resources, requests, tuning, and outcomes.

pub mod config;
pub mod report;
pub mod resource;

pub use config::{
    DedupeConfig, MatchMode, MergeRequest, NearMatchConfig, ResourceFilter, ScanConfig,
    ScannerConfig, SchedulerConfig, SimilarityMethod,
};
pub use report::{
    DedupeAction, DedupeOutcome, DeleteOutcome, DuplicateGroup, MergeOutcome, ScanReport,
};
pub use resource::{PropertyId, Resource, ResourceId, ResourceKind, Value, ValueData};
