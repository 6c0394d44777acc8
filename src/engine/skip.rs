//! Ambiguity detection and deletion-set computation.
//!
//! Both functions are pure: they look only at the groups a scan produced and
//! never touch the store, so the safety properties are easy to test in
//! isolation.

use std::collections::{BTreeSet, HashMap};

use crate::types::report::DuplicateGroup;
use crate::types::resource::ResourceId;

/// Resource ids that are non-keep members of two or more distinct groups.
///
/// Such a resource would be "the duplicate to delete" under more than one
/// value at once. Deleting it for one value risks losing the other, so the
/// automatic workflow leaves it alone and reports it instead.
pub fn skip_set(groups: &[DuplicateGroup]) -> BTreeSet<ResourceId> {
    let mut appearances: HashMap<ResourceId, usize> = HashMap::new();
    for group in groups {
        for id in group.non_keep() {
            *appearances.entry(*id).or_default() += 1;
        }
    }
    appearances
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(id, _)| id)
        .collect()
}

/// The ids the automatic workflow may delete, ascending.
///
/// The union of every group's non-keep members, minus the skip set, minus
/// every group's keep id. The last subtraction matters for multi-valued
/// properties: one id can be the keeper of one group and a non-keep member
/// of another, and deleting it would orphan the group it keeps. The pair it
/// leaves behind is caught by the next sweep.
pub fn deletion_set(groups: &[DuplicateGroup], skips: &BTreeSet<ResourceId>) -> Vec<ResourceId> {
    let keeps: BTreeSet<ResourceId> = groups.iter().filter_map(DuplicateGroup::keep).collect();

    let mut to_delete = BTreeSet::new();
    for group in groups {
        for id in group.non_keep() {
            if !skips.contains(id) && !keeps.contains(id) {
                to_delete.insert(*id);
            }
        }
    }
    to_delete.into_iter().collect()
}
