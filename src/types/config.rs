//! Request and tuning types.
//!
//! Requests ([`ScanConfig`], [`MergeRequest`]) describe one operation and
//! travel with it, including across a job queue. Tuning structs
//! ([`ScannerConfig`], [`NearMatchConfig`], [`SchedulerConfig`]) are injected
//! at construction and carry the limits the engine enforces.

use serde::{Deserialize, Serialize};

use crate::types::resource::{PropertyId, ResourceId, ResourceKind};

/// How literal values are normalized before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Byte-exact comparison.
    #[default]
    Exact,
    /// Unicode-lowercase both sides before comparing.
    CaseInsensitive,
}

impl MatchMode {
    /// The grouping key for a raw literal under this mode.
    pub fn normalize(&self, raw: &str) -> String {
        match self {
            Self::Exact => raw.to_owned(),
            Self::CaseInsensitive => raw.to_lowercase(),
        }
    }
}

/// Similarity heuristics available for near-match resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// The input value itself, without consulting the store.
    Equal,
    /// Longest-common-substring similarity percentage.
    SimilarText,
    /// Edit distance.
    Levenshtein,
    /// Metaphone phonetic code equality.
    Metaphone,
    /// Soundex phonetic code equality.
    Soundex,
}

/// Restricts the resources an operation considers.
///
/// An empty filter matches everything. `exclude_ids` wins over `include_ids`
/// when an id appears in both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFilter {
    /// When non-empty, only these ids match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_ids: Vec<ResourceId>,
    /// These ids never match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_ids: Vec<ResourceId>,
}

impl ResourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter matching exactly the given ids.
    pub fn for_ids(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        Self {
            include_ids: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A filter matching everything except the given ids.
    pub fn excluding(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        Self {
            exclude_ids: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include_ids.is_empty() && self.exclude_ids.is_empty()
    }

    /// Whether a resource id passes this filter.
    pub fn matches(&self, id: ResourceId) -> bool {
        if self.exclude_ids.contains(&id) {
            return false;
        }
        self.include_ids.is_empty() || self.include_ids.contains(&id)
    }
}

/// One duplicate scan request: what to scan, how to compare, and whether to
/// act on the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Kind of resource to scan.
    pub kind: ResourceKind,
    /// Property whose literal values are compared.
    pub property: PropertyId,
    /// Value normalization mode.
    #[serde(default)]
    pub mode: MatchMode,
    /// Optional restriction of the scanned resource set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ResourceFilter>,
    /// When false, report what would be deleted without touching the store.
    #[serde(default = "default_process")]
    pub process: bool,
}

fn default_process() -> bool {
    true
}

impl ScanConfig {
    /// An exact-match, processing scan over all resources of `kind`.
    pub fn new(kind: ResourceKind, property: impl Into<PropertyId>) -> Self {
        Self {
            kind,
            property: property.into(),
            mode: MatchMode::default(),
            filter: None,
            process: true,
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn case_insensitive(self) -> Self {
        self.with_mode(MatchMode::CaseInsensitive)
    }

    pub fn with_filter(mut self, filter: ResourceFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Report only; leave the store untouched.
    pub fn dry_run(mut self) -> Self {
        self.process = false;
        self
    }
}

/// An explicit merge request: rewrite every reference pointing at a merged
/// id to target `keep`, then delete the merged resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Kind of the keeper and of every merged resource.
    pub kind: ResourceKind,
    /// The resource that survives.
    pub keep: ResourceId,
    /// The resources folded into the keeper.
    pub merged: Vec<ResourceId>,
}

impl MergeRequest {
    pub fn new(
        kind: ResourceKind,
        keep: impl Into<ResourceId>,
        merged: impl IntoIterator<Item = ResourceId>,
    ) -> Self {
        Self {
            kind,
            keep: keep.into(),
            merged: merged.into_iter().collect(),
        }
    }
}

/// Tuning for [`GroupScanner`](crate::engine::GroupScanner).
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Upper bound, in characters, of a group's comma-joined decimal id
    /// list. Groups whose membership would serialize past this point are
    /// clipped to the longest ascending prefix that fits and flagged as
    /// truncated.
    pub group_payload_cap: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            group_payload_cap: 1_000_000,
        }
    }
}

/// Tuning for [`NearMatchResolver`](crate::engine::NearMatchResolver).
#[derive(Debug, Clone)]
pub struct NearMatchConfig {
    /// Maximum distinct candidate values a non-equal method will score.
    /// Larger sets are refused rather than scanned.
    pub max_candidates: usize,
    /// Similarity percentage a candidate must exceed (strictly) to match
    /// under [`SimilarityMethod::SimilarText`].
    pub similar_text_cutoff: f64,
    /// Edit distance a candidate must stay under (strictly) to match under
    /// [`SimilarityMethod::Levenshtein`].
    pub levenshtein_cutoff: usize,
}

impl Default for NearMatchConfig {
    fn default() -> Self {
        Self {
            max_candidates: 10_000,
            similar_text_cutoff: 66.0,
            levenshtein_cutoff: 10,
        }
    }
}

/// Tuning for [`BatchScheduler`](crate::engine::BatchScheduler).
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Largest deletion set executed inline. Anything bigger goes to the
    /// job runner.
    pub sync_delete_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sync_delete_limit: 100,
        }
    }
}

/// Bundle of all engine tuning, injected into the
/// [`Deduplicator`](crate::engine::Deduplicator) facade.
#[derive(Debug, Clone, Default)]
pub struct DedupeConfig {
    pub scanner: ScannerConfig,
    pub near_match: NearMatchConfig,
    pub scheduler: SchedulerConfig,
}
