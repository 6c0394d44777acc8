//! Explicit merge execution.
//!
//! The one workflow that actively maintains referential integrity: every
//! reference pointing at a merged resource is rewritten to point at the
//! keeper before anything is deleted. The cost scales with the number of
//! referencing resources, not with the size of the merged set, which is why
//! the scheduler always runs merges as background jobs.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{DedupeError, Result};
use crate::traits::notifier::Notifier;
use crate::traits::store::ResourceStore;
use crate::types::config::{MergeRequest, ResourceFilter};
use crate::types::report::MergeOutcome;
use crate::types::resource::{ResourceId, ResourceKind, ValueData};

/// Folds a set of resources into one keeper.
pub struct MergeExecutor<S: ResourceStore> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: ResourceStore> MergeExecutor<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Execute one merge request.
    ///
    /// Rewrites every reference value in the store that points at a merged
    /// id so it points at `request.keep` instead, across all resource
    /// kinds, then deletes the merged resources. A request whose merged ids
    /// no longer exist is a no-op, so re-running a completed merge is safe.
    ///
    /// The first failed rewrite aborts the merge before any deletion
    /// happens; no stored reference can be left dangling. Already-rewritten
    /// resources stop matching the reference query, so a re-dispatched
    /// request resumes where the failed one stopped. Cancellation is
    /// checked between per-resource rewrites and aborts the same way.
    pub async fn merge(
        &self,
        request: &MergeRequest,
        cancel: &CancellationToken,
    ) -> Result<MergeOutcome> {
        // The keeper is never merged into itself, whatever the caller sent.
        let mut merged: Vec<ResourceId> = request
            .merged
            .iter()
            .copied()
            .filter(|id| *id != request.keep)
            .collect();
        merged.sort_unstable();
        merged.dedup();

        if merged.is_empty() {
            return Ok(MergeOutcome::noop(request.keep));
        }

        let surviving = self
            .store
            .query(
                request.kind,
                Some(&ResourceFilter::for_ids(merged.iter().copied())),
            )
            .await?;
        if surviving.is_empty() {
            self.notifier.notice(&format!(
                "merge into {} has nothing left to do; the merged resources no longer exist",
                request.keep
            ));
            return Ok(MergeOutcome::noop(request.keep));
        }

        let keeper = self
            .store
            .query(request.kind, Some(&ResourceFilter::for_ids([request.keep])))
            .await?;
        if keeper.is_empty() {
            return Err(DedupeError::KeepMissing { id: request.keep });
        }

        let mut rewritten = 0usize;
        for kind in ResourceKind::ALL {
            let referencing = self.store.referencing_resources(kind, &merged).await?;
            for id in referencing {
                if cancel.is_cancelled() {
                    return Err(DedupeError::Cancelled);
                }
                rewritten += self
                    .rewrite_references(kind, id, &merged, request.keep)
                    .await?;
            }
        }

        self.store.batch_delete(request.kind, &surviving).await?;

        info!(
            keep = %request.keep,
            kind = %request.kind,
            merged = surviving.len(),
            rewritten,
            "merge complete"
        );

        Ok(MergeOutcome {
            keep: request.keep,
            merged_count: surviving.len(),
            rewritten_resources: rewritten,
        })
    }

    /// Point every reference to a merged id at the keeper instead, leaving
    /// all other values untouched. Returns 1 when the resource changed.
    async fn rewrite_references(
        &self,
        kind: ResourceKind,
        id: ResourceId,
        merged: &[ResourceId],
        keep: ResourceId,
    ) -> Result<usize> {
        let wrap = |source: DedupeError| DedupeError::RewriteFailed {
            kind,
            id,
            source: Box::new(source),
        };

        let mut values = self.store.read_values(kind, id).await.map_err(wrap)?;
        let mut changed = false;
        for value in &mut values {
            if let ValueData::Reference(target) = value.data {
                if merged.contains(&target) {
                    value.data = ValueData::Reference(keep);
                    changed = true;
                }
            }
        }
        if !changed {
            return Ok(0);
        }

        self.store
            .write_values(kind, id, values)
            .await
            .map_err(wrap)?;
        debug!(kind = %kind, id = %id, keep = %keep, "references rewritten");
        Ok(1)
    }
}
