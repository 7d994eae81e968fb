//! Cache construction

use crate::config::CacheOptions;
use crate::disk_usage::{DiskUsageProbe, StatvfsProbe};
use crate::errors::Result;
use crate::eviction::create_eviction_policy;
use crate::storage::{create_compression, FileStore};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::watch;

use super::cleanup::start_controllers;
use super::index::Index;
use super::internal::CacheStats;
use super::types::{Cache, CacheInner};

impl Cache {
    /// Open a cache rooted at `options.root` and start its background controllers
    ///
    /// Must be called from within a tokio runtime. The index starts empty, so
    /// files left by a previous process are treated as orphans.
    pub async fn new(options: CacheOptions) -> Result<Self> {
        Self::with_probe(options, Arc::new(StatvfsProbe)).await
    }

    /// Like [`new`](Self::new) with a custom disk usage source
    pub async fn with_probe(options: CacheOptions, probe: Arc<dyn DiskUsageProbe>) -> Result<Self> {
        options.validate()?;

        let store = FileStore::new(options.root.clone());
        store.prepare().await?;

        let eviction_policy = if options.eviction_enabled() {
            create_eviction_policy(options.eviction_policy)
        } else {
            None
        };

        let (shutdown, _) = watch::channel(false);

        let inner = Arc::new(CacheInner {
            compression: create_compression(options.compression),
            eviction_policy,
            options,
            index: Index::new(),
            store,
            probe,
            stats: CacheStats::default(),
            last_usage: RwLock::new(None),
            alive: AtomicBool::new(true),
            shutdown,
            controllers: Mutex::new(Vec::new()),
        });

        let cache = Self { inner };
        start_controllers(&cache);

        let policy = &cache.inner.eviction_policy;
        let eviction = policy.as_ref().map_or("disabled", |p| p.name());
        tracing::info!(
            root = %cache.inner.options.root.display(),
            compression = %cache.inner.options.compression,
            eviction,
            "Cache opened"
        );

        Ok(cache)
    }
}
