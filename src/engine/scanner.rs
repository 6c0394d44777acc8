//! Duplicate-group scanning.
//!
//! The scanner pulls every literal value of one property in a single store
//! call, so the grouping reflects one consistent snapshot, then groups
//! resource ids by normalized value. Groups with fewer than two distinct
//! resources are noise and are dropped.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::traits::notifier::Notifier;
use crate::traits::store::ValueStore;
use crate::types::config::{ScanConfig, ScannerConfig};
use crate::types::report::{DuplicateGroup, ScanReport};
use crate::types::resource::ResourceId;

/// Groups resources by normalized literal value.
pub struct GroupScanner<S: ValueStore> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    config: ScannerConfig,
}

impl<S: ValueStore> GroupScanner<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_config(store, notifier, ScannerConfig::default())
    }

    pub fn with_config(store: Arc<S>, notifier: Arc<dyn Notifier>, config: ScannerConfig) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Run one scan and report every duplicate group found.
    ///
    /// An unknown property or a filter matching nothing yields an empty
    /// report, not an error; a dedup sweep over nothing is a normal outcome.
    pub async fn scan(&self, scan: &ScanConfig) -> Result<ScanReport> {
        let rows = self
            .store
            .literal_values(scan.kind, scan.property, scan.filter.as_ref())
            .await?;

        let mut grouped: IndexMap<String, BTreeSet<ResourceId>> = IndexMap::new();
        for row in rows {
            // Stores exclude blank literals already; re-guard here so a
            // permissive backend cannot produce a group keyed on "".
            if row.value.trim().is_empty() {
                continue;
            }
            grouped
                .entry(scan.mode.normalize(&row.value))
                .or_default()
                .insert(row.resource);
        }

        let mut groups = Vec::new();
        for (value, members) in grouped {
            if members.len() < 2 {
                continue;
            }
            let (members, truncated) = self.clip_to_cap(&value, members.into_iter().collect());
            if members.len() < 2 {
                continue;
            }
            groups.push(DuplicateGroup {
                value,
                members,
                truncated,
            });
        }
        groups.sort_by(|a, b| a.value.cmp(&b.value));

        debug!(
            kind = %scan.kind,
            property = %scan.property,
            mode = ?scan.mode,
            groups = groups.len(),
            "duplicate scan complete"
        );

        Ok(ScanReport { groups })
    }

    /// Enforce the aggregation cap: the members of a group, serialized as a
    /// comma-joined decimal id list, must fit in `group_payload_cap`
    /// characters. Keeps the longest ascending prefix that fits; the first
    /// id that would cross the cap, and everything after it, is dropped.
    fn clip_to_cap(&self, value: &str, members: Vec<ResourceId>) -> (Vec<ResourceId>, bool) {
        let mut serialized = 0usize;
        for (index, id) in members.iter().enumerate() {
            let digits = (id.0.checked_ilog10().unwrap_or(0) + 1) as usize;
            let comma = usize::from(index > 0);
            if serialized + comma + digits > self.config.group_payload_cap {
                let dropped = members.len() - index;
                self.notifier.warn(&format!(
                    "duplicate group \"{value}\" exceeds the aggregation cap \
                     ({} of {} members kept, {dropped} dropped); rescan after \
                     this batch to pick up the rest",
                    index,
                    members.len(),
                ));
                let mut kept = members;
                kept.truncate(index);
                return (kept, true);
            }
            serialized += comma + digits;
        }
        (members, false)
    }
}
