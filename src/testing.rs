//! Testing utilities: recording mocks and store fixtures.
//!
//! Useful for testing applications built on the engine without a real
//! backend or job queue, and used by the crate's own tests.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{DedupeError, Result};
use crate::stores::MemoryStore;
use crate::traits::notifier::Notifier;
use crate::traits::runner::{JobHandle, JobId, JobRequest, JobRunner, JobStatus};
use crate::traits::search::Search;
use crate::traits::store::{LiteralRow, ValueStore};
use crate::types::config::ResourceFilter;
use crate::types::resource::{PropertyId, Resource, ResourceId, ResourceKind, Value};

/// Notifier that records every message for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    warnings: RwLock<Vec<String>>,
    notices: RwLock<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.read().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.read().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.warnings.write().unwrap().push(message.to_owned());
    }

    fn notice(&self, message: &str) {
        self.notices.write().unwrap().push(message.to_owned());
    }
}

/// Job runner that records dispatches without executing anything.
///
/// Every accepted job stays `Queued` forever; tests assert on what was
/// dispatched rather than on execution effects.
#[derive(Default)]
pub struct RecordingRunner {
    dispatched: RwLock<Vec<JobRequest>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<JobRequest> {
        self.dispatched.read().unwrap().clone()
    }
}

#[async_trait]
impl JobRunner for RecordingRunner {
    async fn dispatch(&self, request: JobRequest) -> Result<JobHandle> {
        self.dispatched.write().unwrap().push(request);
        Ok(JobHandle {
            id: JobId::new_v4(),
        })
    }

    async fn status(&self, _id: JobId) -> Result<Option<JobStatus>> {
        Ok(None)
    }

    async fn cancel(&self, _id: JobId) -> Result<bool> {
        Ok(false)
    }
}

/// Fluent builder of a seeded [`MemoryStore`].
///
/// `with_literal` and `with_reference` create the resource on first
/// mention, so a fixture reads as a flat list of values.
#[derive(Default, Clone)]
pub struct StoreBuilder {
    resources: BTreeMap<(ResourceKind, ResourceId), Resource>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.insert((resource.kind, resource.id), resource);
        self
    }

    /// Attach a literal value, creating the resource if needed.
    pub fn with_literal(
        mut self,
        kind: ResourceKind,
        id: u64,
        property: PropertyId,
        text: impl Into<String>,
    ) -> Self {
        self.resources
            .entry((kind, ResourceId(id)))
            .or_insert_with(|| Resource::new(id, kind))
            .values
            .push(Value::literal(property, text));
        self
    }

    /// Attach a reference value, creating the resource if needed.
    pub fn with_reference(
        mut self,
        kind: ResourceKind,
        id: u64,
        property: PropertyId,
        target: u64,
    ) -> Self {
        self.resources
            .entry((kind, ResourceId(id)))
            .or_insert_with(|| Resource::new(id, kind))
            .values
            .push(Value::reference(property, ResourceId(target)));
        self
    }

    pub fn build(self) -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        for resource in self.resources.into_values() {
            store.insert(resource);
        }
        Arc::new(store)
    }
}

/// Store wrapper that fails chosen operations, for error-path tests.
///
/// Delegates everything to an inner [`MemoryStore`] except the operations
/// told to fail.
pub struct FailingStore {
    inner: Arc<MemoryStore>,
    fail_writes_on: RwLock<HashSet<(ResourceKind, ResourceId)>>,
    fail_deletes: RwLock<bool>,
}

impl FailingStore {
    pub fn wrap(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_writes_on: RwLock::new(HashSet::new()),
            fail_deletes: RwLock::new(false),
        }
    }

    /// Make `write_values` fail for one resource.
    pub fn fail_writes_on(self, kind: ResourceKind, id: u64) -> Self {
        self.fail_writes_on
            .write()
            .unwrap()
            .insert((kind, ResourceId(id)));
        self
    }

    /// Make every `batch_delete` fail.
    pub fn fail_deletes(self) -> Self {
        *self.fail_deletes.write().unwrap() = true;
        self
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl ValueStore for FailingStore {
    async fn literal_values(
        &self,
        kind: ResourceKind,
        property: PropertyId,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<LiteralRow>> {
        self.inner.literal_values(kind, property, filter).await
    }

    async fn referencing_resources(
        &self,
        kind: ResourceKind,
        targets: &[ResourceId],
    ) -> Result<Vec<ResourceId>> {
        self.inner.referencing_resources(kind, targets).await
    }

    async fn read_values(&self, kind: ResourceKind, id: ResourceId) -> Result<Vec<Value>> {
        self.inner.read_values(kind, id).await
    }

    async fn write_values(
        &self,
        kind: ResourceKind,
        id: ResourceId,
        values: Vec<Value>,
    ) -> Result<()> {
        if self.fail_writes_on.read().unwrap().contains(&(kind, id)) {
            return Err(DedupeError::store(format!(
                "injected write failure on {kind} {id}"
            )));
        }
        self.inner.write_values(kind, id, values).await
    }

    async fn batch_delete(&self, kind: ResourceKind, ids: &[ResourceId]) -> Result<()> {
        if *self.fail_deletes.read().unwrap() {
            return Err(DedupeError::store("injected delete failure"));
        }
        self.inner.batch_delete(kind, ids).await
    }
}

#[async_trait]
impl Search for FailingStore {
    async fn query(
        &self,
        kind: ResourceKind,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<ResourceId>> {
        self.inner.query(kind, filter).await
    }
}
