//! Core eviction policy trait definition

use crate::core::Index;
use crate::entry::Entry;
use std::fmt;

/// Eviction policy trait
pub trait EvictionPolicy: Send + Sync + fmt::Debug {
    /// Policy name for logs
    fn name(&self) -> &'static str;

    /// Detach and return the next entry to evict, considering only entries
    /// whose sequence is below `before`. The caller removes the payload.
    fn next_eviction(&self, index: &Index, before: u64) -> Option<Entry>;
}
