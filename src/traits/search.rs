//! Search contract: id-level queries over the resource set.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::config::ResourceFilter;
use crate::types::resource::{ResourceId, ResourceKind};

/// Answers "which resources of this kind exist" questions.
#[async_trait]
pub trait Search: Send + Sync {
    /// Ids of resources of `kind` matching `filter`, ascending. `None`
    /// matches every resource of the kind.
    async fn query(
        &self,
        kind: ResourceKind,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<ResourceId>>;

    /// Match count. The default materializes the ids; backends with a
    /// cheaper count should override it.
    async fn count(&self, kind: ResourceKind, filter: Option<&ResourceFilter>) -> Result<u64> {
        Ok(self.query(kind, filter).await?.len() as u64)
    }
}
