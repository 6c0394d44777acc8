//! Integration tests for the explicit merge workflow.
//!
//! These verify merge completeness (no reference survives pointing at a
//! merged id), idempotent re-runs, the abort-on-error rewrite policy, and
//! cooperative cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use dedupe::testing::{FailingStore, RecordingNotifier, RecordingRunner, StoreBuilder};
use dedupe::{
    DedupeError, Deduplicator, JobRequest, JobRunner, JobState, MergeExecutor, MergeRequest,
    PropertyId, ResourceId, ResourceKind, TokioJobRunner, Value, ValueData, ValueStore,
};

const TITLE: PropertyId = PropertyId(1);
const PART_OF: PropertyId = PropertyId(2);

fn notifier() -> Arc<RecordingNotifier> {
    Arc::new(RecordingNotifier::new())
}

/// Keeper 10, duplicates 11 and 12, and resource 20 referencing 11.
fn seeded() -> StoreBuilder {
    StoreBuilder::new()
        .with_literal(ResourceKind::Item, 10, TITLE, "Dubliners")
        .with_literal(ResourceKind::Item, 11, TITLE, "Dubliners")
        .with_literal(ResourceKind::Item, 12, TITLE, "dubliners")
        .with_reference(ResourceKind::Item, 20, PART_OF, 11)
}

fn reference_targets(values: &[Value]) -> Vec<ResourceId> {
    values.iter().filter_map(Value::as_reference).collect()
}

#[tokio::test]
async fn merge_rewrites_references_and_deletes_the_merged() {
    let store = seeded().build();
    let executor = MergeExecutor::new(store.clone(), notifier());

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11), ResourceId(12)]);
    let outcome = executor
        .merge(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.keep, ResourceId(10));
    assert_eq!(outcome.merged_count, 2);
    assert_eq!(outcome.rewritten_resources, 1);

    // Resource 20 now points at the keeper; 11 and 12 no longer exist.
    let values = store
        .read_values(ResourceKind::Item, ResourceId(20))
        .await
        .unwrap();
    assert_eq!(reference_targets(&values), vec![ResourceId(10)]);
    assert!(store.get(ResourceKind::Item, ResourceId(11)).is_none());
    assert!(store.get(ResourceKind::Item, ResourceId(12)).is_none());
    assert!(store.get(ResourceKind::Item, ResourceId(10)).is_some());
}

#[tokio::test]
async fn merge_reaches_references_across_kinds() {
    let store = seeded()
        .with_reference(ResourceKind::ItemSet, 30, PART_OF, 12)
        .with_reference(ResourceKind::Media, 40, PART_OF, 11)
        .build();
    let executor = MergeExecutor::new(store.clone(), notifier());

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11), ResourceId(12)]);
    let outcome = executor
        .merge(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome.rewritten_resources, 3);

    for (kind, id) in [
        (ResourceKind::Item, 20u64),
        (ResourceKind::ItemSet, 30),
        (ResourceKind::Media, 40),
    ] {
        let values = store.read_values(kind, ResourceId(id)).await.unwrap();
        assert_eq!(reference_targets(&values), vec![ResourceId(10)]);
    }
}

#[tokio::test]
async fn untouched_values_survive_a_rewrite() {
    // 20 also carries a literal and a reference to an unrelated resource.
    let store = seeded()
        .with_literal(ResourceKind::Item, 20, TITLE, "Collected Works")
        .with_reference(ResourceKind::Item, 20, PART_OF, 99)
        .build();
    let executor = MergeExecutor::new(store.clone(), notifier());

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11)]);
    executor
        .merge(&request, &CancellationToken::new())
        .await
        .unwrap();

    let values = store
        .read_values(ResourceKind::Item, ResourceId(20))
        .await
        .unwrap();
    assert!(values
        .iter()
        .any(|v| v.as_literal() == Some("Collected Works")));
    assert_eq!(
        reference_targets(&values),
        vec![ResourceId(10), ResourceId(99)]
    );
}

#[tokio::test]
async fn rerunning_a_completed_merge_is_a_noop() {
    let store = seeded().build();
    let executor = MergeExecutor::new(store.clone(), notifier());
    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11), ResourceId(12)]);
    let cancel = CancellationToken::new();

    let first = executor.merge(&request, &cancel).await.unwrap();
    assert_eq!(first.merged_count, 2);

    let second = executor.merge(&request, &cancel).await.unwrap();
    assert!(second.is_noop());
    assert_eq!(second.keep, ResourceId(10));
    // The rewritten reference is untouched by the no-op.
    let values = store
        .read_values(ResourceKind::Item, ResourceId(20))
        .await
        .unwrap();
    assert_eq!(reference_targets(&values), vec![ResourceId(10)]);
}

#[tokio::test]
async fn keeper_is_stripped_from_the_merged_set() {
    let store = seeded().build();
    let executor = MergeExecutor::new(store.clone(), notifier());

    // The keeper listed among the merged ids must not merge into itself.
    let request = MergeRequest::new(
        ResourceKind::Item,
        10u64,
        [ResourceId(10), ResourceId(11)],
    );
    let outcome = executor
        .merge(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.merged_count, 1);
    assert!(store.get(ResourceKind::Item, ResourceId(10)).is_some());
    assert!(store.get(ResourceKind::Item, ResourceId(11)).is_none());
}

#[tokio::test]
async fn merging_only_the_keeper_is_a_noop() {
    let store = seeded().build();
    let executor = MergeExecutor::new(store.clone(), notifier());

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(10)]);
    let outcome = executor
        .merge(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert!(outcome.is_noop());
    assert_eq!(store.resource_count(ResourceKind::Item), 4);
}

#[tokio::test]
async fn missing_keeper_is_an_error() {
    let store = seeded().build();
    let executor = MergeExecutor::new(store.clone(), notifier());

    let request = MergeRequest::new(ResourceKind::Item, 77u64, [ResourceId(11)]);
    let err = executor
        .merge(&request, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DedupeError::KeepMissing {
            id: ResourceId(77)
        }
    ));
    assert!(store.get(ResourceKind::Item, ResourceId(11)).is_some());
}

#[tokio::test]
async fn failed_rewrite_aborts_before_any_deletion() {
    let inner = seeded().build();
    let store = Arc::new(FailingStore::wrap(inner).fail_writes_on(ResourceKind::Item, 20));
    let executor = MergeExecutor::new(store.clone(), notifier());

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11), ResourceId(12)]);
    let err = executor
        .merge(&request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DedupeError::RewriteFailed {
            kind: ResourceKind::Item,
            id: ResourceId(20),
            ..
        }
    ));
    // Nothing was deleted, so no reference dangles; a re-dispatch can
    // resume from the unrewritten resource.
    assert!(store.inner().get(ResourceKind::Item, ResourceId(11)).is_some());
    assert!(store.inner().get(ResourceKind::Item, ResourceId(12)).is_some());
    let values = store
        .read_values(ResourceKind::Item, ResourceId(20))
        .await
        .unwrap();
    assert_eq!(reference_targets(&values), vec![ResourceId(11)]);
}

#[tokio::test]
async fn cancellation_stops_the_merge_before_deletion() {
    let store = seeded().build();
    let executor = MergeExecutor::new(store.clone(), notifier());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11)]);
    let err = executor.merge(&request, &cancel).await.unwrap_err();
    assert!(matches!(err, DedupeError::Cancelled));

    // The merged resource and the old reference are both still in place.
    assert!(store.get(ResourceKind::Item, ResourceId(11)).is_some());
    let values = store
        .read_values(ResourceKind::Item, ResourceId(20))
        .await
        .unwrap();
    assert_eq!(reference_targets(&values), vec![ResourceId(11)]);
}

#[tokio::test]
async fn the_facade_always_dispatches_merges() {
    let store = seeded().build();
    let runner = Arc::new(RecordingRunner::new());
    let engine = Deduplicator::new(store.clone(), runner.clone());

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11)]);
    engine.merge(request.clone()).await.unwrap();

    // Dispatched, never executed inline.
    assert_eq!(
        runner.dispatched(),
        vec![JobRequest::MergeResources(request)]
    );
    assert!(store.get(ResourceKind::Item, ResourceId(11)).is_some());
}

#[tokio::test]
async fn a_dispatched_merge_job_runs_to_completion() {
    let store = seeded().build();
    let runner = TokioJobRunner::new(store.clone());

    let request = MergeRequest::new(ResourceKind::Item, 10u64, [ResourceId(11), ResourceId(12)]);
    let handle = runner
        .dispatch(JobRequest::MergeResources(request))
        .await
        .unwrap();

    let status = loop {
        let status = runner.status(handle.id).await.unwrap().expect("job known");
        if status.is_terminal() {
            break status;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    };

    assert_eq!(status.state, JobState::Succeeded);
    assert!(store.get(ResourceKind::Item, ResourceId(11)).is_none());
    let values = store
        .read_values(ResourceKind::Item, ResourceId(20))
        .await
        .unwrap();
    let targets: Vec<ResourceId> = values
        .iter()
        .filter_map(|v| match v.data {
            ValueData::Reference(target) => Some(target),
            ValueData::Literal(_) => None,
        })
        .collect();
    assert_eq!(targets, vec![ResourceId(10)]);
}
