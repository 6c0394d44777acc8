//! In-process job runner on the tokio runtime.
//!
//! Each dispatched request runs as its own spawned task; status snapshots
//! live in a shared map keyed by job id. Finished jobs stay queryable
//! until [`TokioJobRunner::prune_finished`] drops them, so long-lived
//! processes should prune periodically. Good for single-process
//! deployments and tests. Deployments with a persistent queue implement
//! [`JobRunner`] against their own infrastructure instead; the engine only
//! sees the trait.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::engine::MergeExecutor;
use crate::error::{DedupeError, Result};
use crate::traits::notifier::{Notifier, TracingNotifier};
use crate::traits::runner::{JobHandle, JobId, JobRequest, JobRunner, JobState, JobStatus};
use crate::traits::store::ResourceStore;

struct JobEntry {
    status: JobStatus,
    cancel: CancellationToken,
}

/// Runs engine jobs as tokio tasks.
pub struct TokioJobRunner<S: ResourceStore + 'static> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    jobs: Arc<RwLock<HashMap<JobId, JobEntry>>>,
}

impl<S: ResourceStore + 'static> TokioJobRunner<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            notifier: Arc::new(TracingNotifier),
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Number of jobs the runner still remembers, any state.
    pub fn job_count(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    /// Forget every job that has reached a terminal state, returning how
    /// many entries were dropped. Their statuses become unqueryable.
    pub fn prune_finished(&self) -> usize {
        let mut jobs = self.jobs.write().unwrap();
        let before = jobs.len();
        jobs.retain(|_, entry| !entry.status.is_terminal());
        before - jobs.len()
    }

    fn set_state(jobs: &RwLock<HashMap<JobId, JobEntry>>, id: JobId, state: JobState) {
        if let Some(entry) = jobs.write().unwrap().get_mut(&id) {
            if matches!(state, JobState::Running) {
                entry.status.state = state;
            } else {
                entry.status.finished_at = Some(Utc::now());
                entry.status.state = state;
            }
        }
    }

    async fn run_request(
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
        request: JobRequest,
        cancel: CancellationToken,
    ) -> Result<()> {
        match request {
            JobRequest::DeleteResources { kind, ids } => {
                store.batch_delete(kind, &ids).await?;
                info!(kind = %kind, count = ids.len(), "background deletion complete");
                Ok(())
            }
            JobRequest::MergeResources(merge) => {
                MergeExecutor::new(store, notifier)
                    .merge(&merge, &cancel)
                    .await
                    .map(|_| ())
            }
        }
    }
}

#[async_trait]
impl<S: ResourceStore + 'static> JobRunner for TokioJobRunner<S> {
    async fn dispatch(&self, request: JobRequest) -> Result<JobHandle> {
        let id = JobId::new_v4();
        let params = serde_json::to_value(&request).map_err(DedupeError::dispatch)?;
        let cancel = CancellationToken::new();

        self.jobs.write().unwrap().insert(
            id,
            JobEntry {
                status: JobStatus {
                    id,
                    job_type: request.job_type().to_owned(),
                    params,
                    state: JobState::Queued,
                    enqueued_at: Utc::now(),
                    finished_at: None,
                },
                cancel: cancel.clone(),
            },
        );
        info!(job_id = %id, job_type = request.job_type(), "job dispatched");

        let store = self.store.clone();
        let notifier = self.notifier.clone();
        let jobs = self.jobs.clone();
        tokio::spawn(async move {
            Self::set_state(&jobs, id, JobState::Running);
            let result = Self::run_request(store, notifier, request, cancel).await;
            let state = match result {
                Ok(()) => {
                    info!(job_id = %id, "job succeeded");
                    JobState::Succeeded
                }
                Err(DedupeError::Cancelled) => {
                    info!(job_id = %id, "job cancelled");
                    JobState::Cancelled
                }
                Err(err) => {
                    warn!(job_id = %id, error = %err, "job failed");
                    JobState::Failed {
                        error: err.to_string(),
                    }
                }
            };
            Self::set_state(&jobs, id, state);
        });

        Ok(JobHandle { id })
    }

    async fn status(&self, id: JobId) -> Result<Option<JobStatus>> {
        Ok(self
            .jobs
            .read()
            .unwrap()
            .get(&id)
            .map(|entry| entry.status.clone()))
    }

    async fn cancel(&self, id: JobId) -> Result<bool> {
        let jobs = self.jobs.read().unwrap();
        match jobs.get(&id) {
            Some(entry) if !entry.status.is_terminal() => {
                entry.cancel.cancel();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
