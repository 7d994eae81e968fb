//! Filesystem-backed key/value cache with self-managed capacity
//!
//! This crate provides an embedded, single-process disk cache:
//! - One compressed file per key under a root directory
//! - Per-entry TTL with a cache-wide default
//! - Disk-pressure eviction driven by free-space and usage-percent limits
//! - Reconciliation of orphaned files left by crashes or other processes
//!
//! Entry metadata lives only in memory. Files from a previous process are
//! removed as orphans once the cache is reopened.
//!
//! ```no_run
//! use diskcache::{Cache, CacheOptions, Ttl};
//! use std::time::Duration;
//!
//! # async fn demo() -> diskcache::Result<()> {
//! let cache = Cache::new(CacheOptions::new("/var/cache/app")).await?;
//! cache.set("greeting", b"hello", Duration::from_secs(30)).await?;
//! assert_eq!(cache.get("greeting").await?, b"hello");
//! cache.set("pinned", b"forever", Ttl::Never).await?;
//! cache.delete("greeting").await?;
//! cache.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod disk_usage;
pub mod entry;
pub mod errors;
pub mod eviction;
pub mod keys;
pub mod storage;

pub use self::core::{Cache, EvictionReport, StatsSnapshot};
pub use config::{CacheOptions, CacheOptionsLoader};
pub use disk_usage::{DiskUsage, DiskUsageProbe, StatvfsProbe};
pub use entry::{Entry, Ttl};
pub use errors::{CacheError, Error, RecoveryHint, Result};
pub use eviction::{EvictionPolicy, EvictionPolicyKind};
pub use storage::{Compression, CompressionKind};
