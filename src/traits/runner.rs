//! Background job contract for work too large to run inline.
//!
//! The engine never blocks a caller on a big deletion or a merge. It hands
//! the work to a [`JobRunner`] and returns a [`JobHandle`] the caller can
//! poll. [`TokioJobRunner`](crate::runners::TokioJobRunner) runs jobs on
//! the current tokio runtime; deployments with a persistent queue implement
//! this trait against their own infrastructure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::types::config::MergeRequest;
use crate::types::resource::{ResourceId, ResourceKind};

/// Identifier of a dispatched job.
pub type JobId = Uuid;

/// Work the engine hands to a runner. Serializable so queue-backed runners
/// can persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobRequest {
    /// Bulk deletion of redundant resources.
    DeleteResources {
        kind: ResourceKind,
        ids: Vec<ResourceId>,
    },
    /// An explicit merge. Merges always run in the background.
    MergeResources(MergeRequest),
}

impl JobRequest {
    /// Short name used in logs and job records.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::DeleteResources { .. } => "delete_resources",
            Self::MergeResources(_) => "merge_resources",
        }
    }
}

/// Handle to a dispatched job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: JobId,
}

/// Lifecycle state of a dispatched job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed { error: String },
    Cancelled,
}

/// Status snapshot of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: JobId,
    /// Job type name, as reported by [`JobRequest::job_type`].
    pub job_type: String,
    /// The request, captured at dispatch time.
    pub params: serde_json::Value,
    pub state: JobState,
    pub enqueued_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobStatus {
    /// Whether the job has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            JobState::Succeeded | JobState::Failed { .. } | JobState::Cancelled
        )
    }
}

/// Executes engine jobs in the background.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Queue a job. Returns as soon as the job is accepted.
    async fn dispatch(&self, request: JobRequest) -> Result<JobHandle>;

    /// Status of a previously dispatched job, if the runner still knows it.
    async fn status(&self, id: JobId) -> Result<Option<JobStatus>>;

    /// Ask a job to stop. Returns false when the job is unknown or already
    /// finished. Cancellation is cooperative; the job stops at its next
    /// checkpoint.
    async fn cancel(&self, id: JobId) -> Result<bool>;
}
