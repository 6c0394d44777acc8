//! Operator-facing notices that accompany successful results.
//!
//! Some conditions are worth telling an operator about without failing the
//! operation: a duplicate group clipped by the aggregation cap, resources
//! skipped for ambiguity, an oversized candidate set. Those travel through
//! a [`Notifier`]. Hard failures travel through
//! [`DedupeError`](crate::error::DedupeError) instead.

use tracing::{info, warn};

/// Sink for warnings and notices raised while an operation runs.
pub trait Notifier: Send + Sync {
    /// A recoverable anomaly the operator should act on.
    fn warn(&self, message: &str);

    /// An informational notice.
    fn notice(&self, message: &str);
}

/// Notifier that forwards everything to `tracing`. The default when no
/// other sink is injected.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn notice(&self, message: &str) {
        info!("{message}");
    }
}
