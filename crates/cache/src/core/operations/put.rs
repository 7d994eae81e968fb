//! Cache put operations

use crate::entry::Ttl;
use crate::errors::Result;
use crate::keys::validate_key;
use std::time::SystemTime;

use super::super::internal::CacheStats;
use super::super::types::Cache;

impl Cache {
    /// Store `value` under `key`, replacing any previous value
    ///
    /// The payload is written before the key is registered, so a concurrent
    /// reader sees either the old entry or the complete new one. A replaced
    /// key restarts its TTL and moves to the back of the eviction order.
    pub async fn set(&self, key: &str, value: &[u8], ttl: impl Into<Ttl>) -> Result<()> {
        validate_key(key)?;
        let ttl = ttl.into();

        let payload = match self.inner.compression.compress(value) {
            Ok(payload) => payload,
            Err(e) => {
                CacheStats::record(&self.inner.stats.errors);
                return Err(e);
            }
        };

        let _pending = self.inner.index.begin_write(key);

        if let Err(e) = self.inner.store.write(key, &payload).await {
            CacheStats::record(&self.inner.stats.errors);
            tracing::warn!(key = %key, error = %e, "Failed to write cache file");
            return Err(e);
        }

        let size = payload.len() as u64;
        let now = SystemTime::now();
        let replaced = self.inner.index.insert(key.to_string(), size, ttl, now);

        CacheStats::record(&self.inner.stats.writes);
        tracing::debug!(
            key = %key,
            size,
            original_size = value.len(),
            replaced = replaced.is_some(),
            "Cached value"
        );

        Ok(())
    }
}
