//! Inline-versus-background execution policy.
//!
//! Small deletion sets are finished before the call returns; anything
//! bigger goes to the job runner so the caller is never blocked on bulk
//! work. Merges always go to the runner, whatever their size, because the
//! reference rewrite touches an unbounded portion of the resource graph.

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::traits::runner::{JobHandle, JobRequest, JobRunner};
use crate::traits::store::ValueStore;
use crate::types::config::{MergeRequest, SchedulerConfig};
use crate::types::report::DeleteOutcome;
use crate::types::resource::{ResourceId, ResourceKind};

/// Decides whether work runs inline or on the job runner.
pub struct BatchScheduler<S: ValueStore> {
    store: Arc<S>,
    runner: Arc<dyn JobRunner>,
    config: SchedulerConfig,
}

impl<S: ValueStore> BatchScheduler<S> {
    pub fn new(store: Arc<S>, runner: Arc<dyn JobRunner>) -> Self {
        Self::with_config(store, runner, SchedulerConfig::default())
    }

    pub fn with_config(
        store: Arc<S>,
        runner: Arc<dyn JobRunner>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            runner,
            config,
        }
    }

    /// Delete a set of resources, inline when it is small enough.
    pub async fn execute_delete(
        &self,
        kind: ResourceKind,
        ids: &[ResourceId],
    ) -> Result<DeleteOutcome> {
        if ids.is_empty() {
            return Ok(DeleteOutcome::NothingToDo);
        }

        if ids.len() <= self.config.sync_delete_limit {
            self.store.batch_delete(kind, ids).await?;
            info!(kind = %kind, count = ids.len(), "deleted duplicates inline");
            return Ok(DeleteOutcome::Deleted { count: ids.len() });
        }

        let handle = self
            .runner
            .dispatch(JobRequest::DeleteResources {
                kind,
                ids: ids.to_vec(),
            })
            .await?;
        info!(
            kind = %kind,
            count = ids.len(),
            job_id = %handle.id,
            "deletion set exceeds the inline limit, dispatched to the job runner"
        );
        Ok(DeleteOutcome::Scheduled { handle })
    }

    /// Hand a merge to the job runner. Never runs inline.
    pub async fn schedule_merge(&self, request: MergeRequest) -> Result<JobHandle> {
        let handle = self
            .runner
            .dispatch(JobRequest::MergeResources(request))
            .await?;
        info!(job_id = %handle.id, "merge dispatched to the job runner");
        Ok(handle)
    }
}
