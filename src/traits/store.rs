//! Store contract: the query and mutation surface the engine is given.
//!
//! The engine never owns resource data. Everything it reads or changes goes
//! through these methods, so any backend that can answer them can be
//! deduplicated: the in-memory store for tests, the Postgres store, or an
//! application's own persistence layer.

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::search::Search;
use crate::types::config::ResourceFilter;
use crate::types::resource::{PropertyId, ResourceId, ResourceKind, Value};

/// One row of a literal-value query: which resource carries which text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralRow {
    pub resource: ResourceId,
    pub value: String,
}

/// Read and write access to resource values.
#[async_trait]
pub trait ValueStore: Send + Sync {
    /// Every non-empty literal value of `property` on resources of `kind`
    /// matching `filter`.
    ///
    /// A resource appears once per literal it carries, so one resource can
    /// contribute several rows. The whole row set comes back from a single
    /// call; callers treat it as one consistent snapshot.
    async fn literal_values(
        &self,
        kind: ResourceKind,
        property: PropertyId,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<LiteralRow>>;

    /// Ids of resources of `kind` holding at least one reference value that
    /// points at any of `targets`. Ascending, deduplicated.
    async fn referencing_resources(
        &self,
        kind: ResourceKind,
        targets: &[ResourceId],
    ) -> Result<Vec<ResourceId>>;

    /// The full value set of one resource. Errors when the resource does
    /// not exist.
    async fn read_values(&self, kind: ResourceKind, id: ResourceId) -> Result<Vec<Value>>;

    /// Replace the value set of one resource, leaving everything else about
    /// it untouched. Errors when the resource does not exist.
    async fn write_values(&self, kind: ResourceKind, id: ResourceId, values: Vec<Value>)
        -> Result<()>;

    /// Delete the given resources and the values they carry. Ids that no
    /// longer exist are ignored. On error the caller must assume nothing
    /// about which deletions happened.
    async fn batch_delete(&self, kind: ResourceKind, ids: &[ResourceId]) -> Result<()>;
}

/// Everything the [`Deduplicator`](crate::engine::Deduplicator) facade
/// needs from a backend. Implemented automatically for any type providing
/// both halves.
pub trait ResourceStore: ValueStore + Search {}

impl<T: ValueStore + Search> ResourceStore for T {}
