//! Types for the pool module.

use serde::{Deserialize, Serialize};

/// Snapshot of pool counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Jobs currently executing.
    pub active: usize,
    /// Jobs waiting for a permit.
    pub queued: usize,
    pub max_concurrent: usize,
    /// Jobs that finished, whatever their outcome.
    pub total_processed: u64,
    pub total_failed: u64,
    pub total_skipped: u64,
}

impl PoolStatus {
    pub fn is_idle(&self) -> bool {
        self.active == 0 && self.queued == 0
    }
}
