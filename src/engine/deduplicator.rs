//! The main entry point: one object wiring every engine component to a
//! store, a job runner, and a notifier.

use std::sync::Arc;

use crate::engine::{
    deletion_set, skip_set, BatchScheduler, GroupScanner, MergeExecutor, NearMatchResolver,
};
use crate::error::Result;
use crate::traits::notifier::{Notifier, TracingNotifier};
use crate::traits::runner::{JobHandle, JobRunner};
use crate::traits::store::ResourceStore;
use crate::types::config::{DedupeConfig, MergeRequest, ResourceFilter, ScanConfig, SimilarityMethod};
use crate::types::report::{DedupeAction, DedupeOutcome, ScanReport};
use crate::types::resource::{PropertyId, ResourceKind};

/// The deduplication engine, fully wired.
///
/// Collaborators are injected at construction; the engine never reaches for
/// ambient state.
///
/// # Example
///
/// ```rust,ignore
/// use dedupe::{Deduplicator, MemoryStore, ScanConfig, TokioJobRunner};
///
/// let store = Arc::new(MemoryStore::new());
/// let runner = Arc::new(TokioJobRunner::new(store.clone()));
/// let engine = Deduplicator::new(store, runner);
///
/// let outcome = engine
///     .dedupe(&ScanConfig::new(ResourceKind::Item, title_property).case_insensitive())
///     .await?;
/// ```
pub struct Deduplicator<S: ResourceStore> {
    store: Arc<S>,
    runner: Arc<dyn JobRunner>,
    notifier: Arc<dyn Notifier>,
    config: DedupeConfig,
}

impl<S: ResourceStore> Deduplicator<S> {
    /// Create an engine with default tuning and a tracing-backed notifier.
    pub fn new(store: Arc<S>, runner: Arc<dyn JobRunner>) -> Self {
        Self {
            store,
            runner,
            notifier: Arc::new(TracingNotifier),
            config: DedupeConfig::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_config(mut self, config: DedupeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DedupeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DedupeConfig {
        &mut self.config
    }

    /// Find duplicate groups without acting on them.
    pub async fn scan(&self, scan: &ScanConfig) -> Result<ScanReport> {
        self.scanner().scan(scan).await
    }

    /// Full automatic pass: scan, compute the safe deletion set, and act on
    /// it (or only report it when `scan.process` is false).
    ///
    /// Ambiguous duplicates are excluded from deletion and surfaced through
    /// the notifier; they stay in the outcome's `skipped` set either way.
    pub async fn dedupe(&self, scan: &ScanConfig) -> Result<DedupeOutcome> {
        let report = self.scanner().scan(scan).await?;

        let skipped = skip_set(&report.groups);
        if !skipped.is_empty() {
            let listed: Vec<String> = skipped.iter().map(ToString::to_string).collect();
            self.notifier.notice(&format!(
                "{} resources duplicate more than one value and were left alone: {}",
                skipped.len(),
                listed.join(", "),
            ));
        }

        let to_delete = deletion_set(&report.groups, &skipped);
        let action = if scan.process {
            let outcome = self.scheduler().execute_delete(scan.kind, &to_delete).await?;
            DedupeAction::Executed(outcome)
        } else {
            DedupeAction::DryRun
        };

        Ok(DedupeOutcome {
            report,
            skipped,
            to_delete,
            action,
        })
    }

    /// Stored values of `property` near `input` under `method`.
    pub async fn near_values(
        &self,
        kind: ResourceKind,
        method: SimilarityMethod,
        input: &str,
        property: PropertyId,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<String>> {
        self.resolver()
            .near_values(kind, method, input, property, filter)
            .await
    }

    /// Dispatch an explicit merge to the job runner.
    ///
    /// Merges never run inline; poll the returned handle for completion.
    /// Unlike the automatic pass, a merge does not consult the skip set;
    /// the operator has confirmed the merged set by hand.
    pub async fn merge(&self, request: MergeRequest) -> Result<JobHandle> {
        self.scheduler().schedule_merge(request).await
    }

    /// The executor a job runner uses to carry out a dispatched merge.
    pub fn merge_executor(&self) -> MergeExecutor<S> {
        MergeExecutor::new(self.store.clone(), self.notifier.clone())
    }

    fn scanner(&self) -> GroupScanner<S> {
        GroupScanner::with_config(
            self.store.clone(),
            self.notifier.clone(),
            self.config.scanner.clone(),
        )
    }

    fn resolver(&self) -> NearMatchResolver<S> {
        NearMatchResolver::with_config(
            self.store.clone(),
            self.notifier.clone(),
            self.config.near_match.clone(),
        )
    }

    fn scheduler(&self) -> BatchScheduler<S> {
        BatchScheduler::with_config(
            self.store.clone(),
            self.runner.clone(),
            self.config.scheduler.clone(),
        )
    }
}
