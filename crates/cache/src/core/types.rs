//! Core cache types and structures

use crate::config::CacheOptions;
use crate::disk_usage::{DiskUsage, DiskUsageProbe};
use crate::eviction::EvictionPolicy;
use crate::storage::{Compression, FileStore};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::index::Index;
use super::internal::CacheStats;

/// Filesystem-backed key/value cache
///
/// Cloning is cheap and shares the same cache. Background controllers stop
/// when [`close`](Cache::close) is called or the last handle is dropped.
#[derive(Clone)]
pub struct Cache {
    pub(super) inner: Arc<CacheInner>,
}

pub(crate) struct CacheInner {
    pub options: CacheOptions,
    pub index: Index,
    pub store: FileStore,
    pub compression: Box<dyn Compression>,
    /// `None` when disk-pressure eviction is disabled
    pub eviction_policy: Option<Box<dyn EvictionPolicy>>,
    pub probe: Arc<dyn DiskUsageProbe>,
    pub stats: CacheStats,
    /// Most recent sample taken by the eviction controller
    pub last_usage: RwLock<Option<DiskUsage>>,
    pub alive: AtomicBool,
    /// Flipped to `true` on close; wakes sleeping controllers
    pub shutdown: watch::Sender<bool>,
    pub controllers: Mutex<Vec<JoinHandle<()>>>,
}

impl CacheInner {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stop future controller ticks without waiting for them
    pub fn close(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            self.shutdown.send_replace(true);
            tracing::info!(root = %self.store.root().display(), "Cache closed");
        }
    }

    /// Remove a payload file on behalf of a background path; failures are logged
    pub async fn discard_payload(&self, key: &str, reason: &'static str) -> bool {
        match self.store.remove(key).await {
            Ok(removed) => removed,
            Err(e) => {
                CacheStats::record(&self.stats.errors);
                tracing::warn!(
                    key = %key,
                    reason,
                    error = %e,
                    "Failed to remove cache file"
                );
                false
            }
        }
    }
}

impl Drop for CacheInner {
    fn drop(&mut self) {
        for handle in self.controllers.get_mut().drain(..) {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("root", &self.inner.options.root)
            .field("compression", &self.inner.options.compression)
            .field("entry_count", &self.inner.index.len())
            .field("alive", &self.inner.is_alive())
            .finish()
    }
}
