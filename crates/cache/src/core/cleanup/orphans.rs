//! Orphan reconciliation

use crate::core::internal::CacheStats;
use crate::core::types::{Cache, CacheInner};
use crate::errors::Result;
use crate::storage::FileStore;

impl CacheInner {
    /// Remove root-level files that no index entry accounts for
    ///
    /// Files whose `set` is still between write and registration count as
    /// tracked. Membership is checked per file right before removal, but not
    /// under the index lock: a `delete` followed by a `set` of the same key
    /// landing between the check and the unlink loses the new file. The entry
    /// then reads as a vanished file and is dropped on the next `get`.
    pub(crate) async fn remove_orphans(&self) -> Result<usize> {
        let names = self.store.list().await?;
        let mut removed = 0;

        for name in names {
            let tracked = match FileStore::key_for(&name) {
                Some(key) => self.index.is_tracked(key),
                None => false,
            };
            if tracked {
                continue;
            }

            match self.store.remove_file_named(&name).await {
                Ok(true) => {
                    CacheStats::record(&self.stats.orphans_removed);
                    removed += 1;
                    tracing::debug!(file = ?name, "Removed orphaned cache file");
                }
                Ok(false) => {}
                Err(e) => {
                    CacheStats::record(&self.stats.errors);
                    tracing::warn!(
                        file = ?name,
                        error = %e,
                        "Failed to remove orphaned cache file"
                    );
                }
            }
        }

        if removed > 0 {
            tracing::info!(removed, "Cleaned up orphaned cache files");
        }

        Ok(removed)
    }
}

impl Cache {
    /// Run one orphan reconciliation pass now; returns how many files were removed
    pub async fn remove_orphans(&self) -> Result<usize> {
        self.inner.remove_orphans().await
    }
}
