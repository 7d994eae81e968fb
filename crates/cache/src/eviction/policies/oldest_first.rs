//! Oldest-first eviction: ascending insertion order, reads do not refresh

use crate::core::Index;
use crate::entry::Entry;
use crate::eviction::traits::EvictionPolicy;

/// Evicts the entry that was set longest ago
#[derive(Debug, Clone, Copy, Default)]
pub struct OldestFirstPolicy;

impl EvictionPolicy for OldestFirstPolicy {
    fn name(&self) -> &'static str {
        "oldest-first"
    }

    fn next_eviction(&self, index: &Index, before: u64) -> Option<Entry> {
        index.pop_oldest(before)
    }
}
