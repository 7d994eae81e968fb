//! Cache remove operations

use crate::errors::Result;
use crate::keys::validate_key;

use super::super::internal::CacheStats;
use super::super::types::Cache;

impl Cache {
    /// Remove `key` from the index and its file from storage
    ///
    /// Idempotent: deleting an absent key succeeds. The file is removed even
    /// if the index had no entry. Returns whether anything was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        let entry = self.inner.index.remove(key);

        let file_removed = match self.inner.store.remove(key).await {
            Ok(removed) => removed,
            Err(e) => {
                CacheStats::record(&self.inner.stats.errors);
                return Err(e);
            }
        };

        let removed = entry.is_some() || file_removed;
        if removed {
            CacheStats::record(&self.inner.stats.removals);
            tracing::debug!(key = %key, "Removed cache entry");
        }

        Ok(removed)
    }
}
