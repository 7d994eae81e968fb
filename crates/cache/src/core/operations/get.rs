//! Cache get operations

use crate::errors::{CacheError, Result};
use crate::keys::validate_key;
use std::time::SystemTime;

use super::super::internal::CacheStats;
use super::super::types::Cache;

impl Cache {
    /// Fetch the value stored under `key`
    ///
    /// Fails with [`CacheError::NotFound`] when the key is absent or expired,
    /// or when its file disappeared between lookup and read (a concurrent
    /// delete won the race). Storage and decompression errors propagate.
    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        validate_key(key)?;
        let inner = &self.inner;

        let Some(entry) = inner.index.lookup(key) else {
            CacheStats::record(&inner.stats.misses);
            return Err(CacheError::not_found(key));
        };

        if entry.is_expired(inner.options.default_ttl, SystemTime::now()) {
            let removed = inner.index.remove_if_current(key, entry.sequence);
            if removed.is_some() {
                inner.discard_payload(key, "expired").await;
                CacheStats::record(&inner.stats.expired);
            }
            CacheStats::record(&inner.stats.misses);
            tracing::debug!(key = %key, "Cache entry expired");
            return Err(CacheError::not_found(key));
        }

        let payload = match inner.store.read(key).await {
            Ok(payload) => payload,
            Err(e) => {
                if e.is_not_found() {
                    inner.index.remove_if_current(key, entry.sequence);
                    CacheStats::record(&inner.stats.misses);
                    tracing::debug!(key = %key, "Cache file vanished before read");
                } else {
                    CacheStats::record(&inner.stats.errors);
                }
                return Err(e);
            }
        };

        match inner.compression.decompress(&payload) {
            Ok(value) => {
                CacheStats::record(&inner.stats.hits);
                Ok(value)
            }
            Err(e) => {
                CacheStats::record(&inner.stats.errors);
                tracing::warn!(
                    key = %key,
                    scheme = inner.compression.scheme(),
                    error = %e,
                    "Failed to decompress cached value"
                );
                Err(e)
            }
        }
    }
}
