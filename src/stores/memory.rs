//! In-memory storage implementation for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{DedupeError, Result};
use crate::traits::search::Search;
use crate::traits::store::{LiteralRow, ValueStore};
use crate::types::config::ResourceFilter;
use crate::types::resource::{PropertyId, Resource, ResourceId, ResourceKind, Value};

/// In-memory store of resources and their values.
///
/// Useful for testing and development. Not suitable for production as data
/// is lost on restart. Per-kind `BTreeMap`s keep ids ascending, matching
/// the ordering the store contracts promise.
pub struct MemoryStore {
    resources: RwLock<HashMap<ResourceKind, BTreeMap<ResourceId, Resource>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.resources.write().unwrap().clear();
    }

    /// Insert or replace a resource.
    pub fn insert(&self, resource: Resource) {
        self.resources
            .write()
            .unwrap()
            .entry(resource.kind)
            .or_default()
            .insert(resource.id, resource);
    }

    /// Get a copy of one resource.
    pub fn get(&self, kind: ResourceKind, id: ResourceId) -> Option<Resource> {
        self.resources
            .read()
            .unwrap()
            .get(&kind)
            .and_then(|by_id| by_id.get(&id))
            .cloned()
    }

    /// Number of stored resources of one kind.
    pub fn resource_count(&self, kind: ResourceKind) -> usize {
        self.resources
            .read()
            .unwrap()
            .get(&kind)
            .map_or(0, BTreeMap::len)
    }

    fn not_found(kind: ResourceKind, id: ResourceId) -> DedupeError {
        DedupeError::store(format!("{kind} {id} not found"))
    }
}

#[async_trait]
impl ValueStore for MemoryStore {
    async fn literal_values(
        &self,
        kind: ResourceKind,
        property: PropertyId,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<LiteralRow>> {
        let resources = self.resources.read().unwrap();
        let Some(by_id) = resources.get(&kind) else {
            return Ok(Vec::new());
        };

        Ok(by_id
            .values()
            .filter(|r| filter.map_or(true, |f| f.matches(r.id)))
            .flat_map(|r| {
                r.values
                    .iter()
                    .filter(|v| v.property == property)
                    .filter_map(Value::as_literal)
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| LiteralRow {
                        resource: r.id,
                        value: text.to_owned(),
                    })
            })
            .collect())
    }

    async fn referencing_resources(
        &self,
        kind: ResourceKind,
        targets: &[ResourceId],
    ) -> Result<Vec<ResourceId>> {
        let resources = self.resources.read().unwrap();
        let Some(by_id) = resources.get(&kind) else {
            return Ok(Vec::new());
        };

        Ok(by_id
            .values()
            .filter(|r| r.references().any(|target| targets.contains(&target)))
            .map(|r| r.id)
            .collect())
    }

    async fn read_values(&self, kind: ResourceKind, id: ResourceId) -> Result<Vec<Value>> {
        self.get(kind, id)
            .map(|r| r.values)
            .ok_or_else(|| Self::not_found(kind, id))
    }

    async fn write_values(
        &self,
        kind: ResourceKind,
        id: ResourceId,
        values: Vec<Value>,
    ) -> Result<()> {
        let mut resources = self.resources.write().unwrap();
        let resource = resources
            .get_mut(&kind)
            .and_then(|by_id| by_id.get_mut(&id))
            .ok_or_else(|| Self::not_found(kind, id))?;
        resource.values = values;
        Ok(())
    }

    async fn batch_delete(&self, kind: ResourceKind, ids: &[ResourceId]) -> Result<()> {
        let mut resources = self.resources.write().unwrap();
        if let Some(by_id) = resources.get_mut(&kind) {
            for id in ids {
                by_id.remove(id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Search for MemoryStore {
    async fn query(
        &self,
        kind: ResourceKind,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<ResourceId>> {
        let resources = self.resources.read().unwrap();
        let Some(by_id) = resources.get(&kind) else {
            return Ok(Vec::new());
        };

        Ok(by_id
            .keys()
            .copied()
            .filter(|id| filter.map_or(true, |f| f.matches(*id)))
            .collect())
    }
}
