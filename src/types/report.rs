//! Outcome types returned by scans, deletions and merges.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::traits::runner::JobHandle;
use crate::types::resource::ResourceId;

/// A set of resources sharing one normalized literal value.
///
/// Members are ascending and deduplicated, and a surfaced group always has
/// at least two of them. The lowest id is the group's keeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The normalized value the members share.
    pub value: String,
    /// Member resource ids, ascending.
    pub members: Vec<ResourceId>,
    /// True when the aggregation cap clipped the membership. Rescan after
    /// processing to pick up the dropped ids.
    pub truncated: bool,
}

impl DuplicateGroup {
    /// The member that survives automatic processing: the lowest id.
    pub fn keep(&self) -> Option<ResourceId> {
        self.members.first().copied()
    }

    /// Every member except the keeper.
    pub fn non_keep(&self) -> &[ResourceId] {
        self.members.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of a duplicate scan: every group found, ordered by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub groups: Vec<DuplicateGroup>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Total members across all groups.
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// The group for a normalized value, if one was found.
    pub fn group(&self, value: &str) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.value == value)
    }

    /// Groups the aggregation cap clipped.
    pub fn truncated_groups(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(|g| g.truncated)
    }
}

/// How a deletion set was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The deletion set was empty.
    NothingToDo,
    /// Deleted inline, within the synchronous limit.
    Deleted { count: usize },
    /// Too large for inline execution; handed to the job runner.
    Scheduled { handle: JobHandle },
}

/// Result of an executed merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// The resource everything was folded into.
    pub keep: ResourceId,
    /// How many resources were deleted.
    pub merged_count: usize,
    /// How many resources had references rewritten.
    pub rewritten_resources: usize,
}

impl MergeOutcome {
    /// The outcome of a merge with nothing left to do.
    pub fn noop(keep: ResourceId) -> Self {
        Self {
            keep,
            merged_count: 0,
            rewritten_resources: 0,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.merged_count == 0 && self.rewritten_resources == 0
    }
}

/// What a full deduplication pass found and did.
#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    /// The scan result the pass acted on.
    pub report: ScanReport,
    /// Resources left alone because they duplicate more than one value.
    pub skipped: BTreeSet<ResourceId>,
    /// The deletion set, ascending. Under a dry run this is what would
    /// have been deleted.
    pub to_delete: Vec<ResourceId>,
    /// Whether and how the deletion set was executed.
    pub action: DedupeAction,
}

/// Execution half of a [`DedupeOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupeAction {
    /// `process` was false; the store was not touched.
    DryRun,
    /// The deletion set was handed to the scheduler.
    Executed(DeleteOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(value: &str, members: &[u64]) -> DuplicateGroup {
        DuplicateGroup {
            value: value.to_owned(),
            members: members.iter().copied().map(ResourceId).collect(),
            truncated: false,
        }
    }

    #[test]
    fn keeper_is_the_lowest_member() {
        let g = group("a", &[3, 7, 9]);
        assert_eq!(g.keep(), Some(ResourceId(3)));
        assert_eq!(g.non_keep(), &[ResourceId(7), ResourceId(9)]);
    }

    #[test]
    fn empty_group_has_no_keeper() {
        let g = group("a", &[]);
        assert_eq!(g.keep(), None);
        assert!(g.non_keep().is_empty());
    }

    #[test]
    fn report_lookup_by_value() {
        let report = ScanReport {
            groups: vec![group("alpha", &[1, 2]), group("beta", &[3, 4, 5])],
        };
        assert_eq!(report.len(), 2);
        assert_eq!(report.member_count(), 5);
        assert_eq!(report.group("beta").map(DuplicateGroup::len), Some(3));
        assert!(report.group("gamma").is_none());
    }

    #[test]
    fn merge_outcome_noop_reports_itself() {
        let outcome = MergeOutcome::noop(ResourceId(4));
        assert!(outcome.is_noop());
        assert_eq!(outcome.keep, ResourceId(4));
    }
}
