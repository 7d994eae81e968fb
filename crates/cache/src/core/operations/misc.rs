//! Introspection and lifecycle

use crate::config::CacheOptions;
use crate::disk_usage::DiskUsage;
use crate::entry::Entry;
use std::path::Path;

use super::super::internal::StatsSnapshot;
use super::super::types::Cache;

impl Cache {
    /// Stop background controllers at their next wake-up
    ///
    /// Does not wait for them and leaves the index and files in place;
    /// foreground operations keep working.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        !self.inner.is_alive()
    }

    /// Whether `key` is registered; expiry is not checked
    pub fn contains(&self, key: &str) -> bool {
        self.inner.index.contains(key)
    }

    /// Metadata for `key`, if registered
    pub fn entry(&self, key: &str) -> Option<Entry> {
        self.inner.index.lookup(key)
    }

    pub fn len(&self) -> usize {
        self.inner.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.index.is_empty()
    }

    pub fn root(&self) -> &Path {
        self.inner.store.root()
    }

    pub fn options(&self) -> &CacheOptions {
        &self.inner.options
    }

    /// Last sample taken by the eviction controller
    pub fn last_disk_usage(&self) -> Option<DiskUsage> {
        *self.inner.last_usage.read()
    }

    pub fn statistics(&self) -> StatsSnapshot {
        let index = &self.inner.index;
        self.inner.stats.snapshot(index.len(), index.total_bytes())
    }
}
