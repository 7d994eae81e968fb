//! TTL sweep

use std::time::SystemTime;

use crate::core::internal::CacheStats;
use crate::core::types::{Cache, CacheInner};

impl CacheInner {
    /// Remove every entry whose expiry is strictly before `now`
    ///
    /// Candidates are collected from a snapshot and removed afterwards, one
    /// index write at a time, so the lock is never held across file I/O. An
    /// entry replaced since the snapshot is left alone.
    pub(crate) async fn purge_expired_at(&self, now: SystemTime) -> usize {
        let default_ttl = self.options.default_ttl;
        let expired: Vec<_> = self
            .index
            .snapshot()
            .into_iter()
            .filter(|entry| entry.is_expired(default_ttl, now))
            .collect();

        if expired.is_empty() {
            return 0;
        }

        let mut purged = 0;
        for entry in expired {
            let removed = self.index.remove_if_current(&entry.key, entry.sequence);
            if removed.is_none() {
                continue;
            }

            self.discard_payload(&entry.key, "expired").await;
            CacheStats::record(&self.stats.expired);
            purged += 1;
        }

        tracing::debug!(purged, "Expired cache entries removed");
        purged
    }
}

impl Cache {
    /// Run one TTL sweep now; returns how many entries expired
    pub async fn purge_expired(&self) -> usize {
        self.inner.purge_expired_at(SystemTime::now()).await
    }

    #[cfg(test)]
    pub(crate) async fn purge_expired_at(&self, now: SystemTime) -> usize {
        self.inner.purge_expired_at(now).await
    }
}
