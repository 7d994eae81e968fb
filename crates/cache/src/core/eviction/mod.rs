//! Disk-pressure eviction controller

use crate::config::CacheOptions;
use crate::disk_usage::DiskUsage;
use crate::errors::{CacheError, RecoveryHint, Result};
use serde::Serialize;
use std::sync::Arc;

use super::internal::CacheStats;
use super::types::{Cache, CacheInner};

/// Outcome of one eviction check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvictionReport {
    pub evicted: usize,
    /// Sum of compressed sizes of evicted entries
    pub bytes_released: u64,
}

/// Bytes that must go to bring `usage` back under both thresholds
///
/// The two deficits are independent; the larger one wins.
pub(crate) fn bytes_to_release(options: &CacheOptions, usage: &DiskUsage) -> u64 {
    let mut release = 0;

    if options.min_free_space > 0 && usage.free_bytes < options.min_free_space {
        release = release.max(options.min_free_space - usage.free_bytes);
    }

    if options.max_usage_percent > 0.0 && usage.used_percent > options.max_usage_percent {
        let ceiling = (usage.total_bytes as f64 / 100.0 * options.max_usage_percent) as u64;
        release = release.max(usage.used_bytes.saturating_sub(ceiling));
    }

    release
}

impl CacheInner {
    /// Sample disk usage and remember it for diagnostics
    async fn sample_disk_usage(&self) -> Result<DiskUsage> {
        let root = self.options.root.clone();
        let probe = Arc::clone(&self.probe);

        let path = root.clone();
        let task = tokio::task::spawn_blocking(move || probe.usage(&path));
        let sampled = match task.await {
            Ok(sampled) => sampled,
            Err(e) => Err(std::io::Error::other(e)),
        };

        match sampled {
            Ok(usage) => {
                *self.last_usage.write() = Some(usage);
                Ok(usage)
            }
            Err(source) => Err(CacheError::DiskUsageUnavailable {
                path: root,
                source,
                recovery_hint: RecoveryHint::Retry {
                    after: self.options.check_evictions_period,
                },
            }),
        }
    }

    /// Evict oldest-first until disk usage is back under the configured limits
    ///
    /// Only entries that existed when the check started are candidates. After
    /// each batch the disk is sampled again, since other writers share the
    /// volume. The check ends when usage is within limits or no candidate is
    /// left.
    pub(crate) async fn enforce_disk_limits(&self) -> Result<EvictionReport> {
        let mut report = EvictionReport::default();
        let Some(policy) = self.eviction_policy.as_deref() else {
            return Ok(report);
        };

        let watermark = self.index.next_sequence();

        loop {
            let usage = self.sample_disk_usage().await?;
            let to_release = bytes_to_release(&self.options, &usage);
            if to_release == 0 {
                break;
            }

            tracing::debug!(
                to_release,
                free_bytes = usage.free_bytes,
                used_percent = usage.used_percent,
                "Disk usage over limits"
            );

            let mut remaining = to_release;
            let mut batch = 0usize;
            while remaining > 0 {
                let Some(victim) = policy.next_eviction(&self.index, watermark) else {
                    break;
                };

                self.discard_payload(&victim.key, "evicted").await;
                CacheStats::record(&self.stats.evicted);
                remaining = remaining.saturating_sub(victim.compressed_size);
                report.bytes_released += victim.compressed_size;
                batch += 1;
            }

            if batch == 0 {
                tracing::warn!(
                    to_release,
                    "Disk usage over limits but no cache entries left to evict"
                );
                break;
            }

            report.evicted += batch;
            tracing::info!(
                evicted = batch,
                policy = policy.name(),
                "Evicted cache entries under disk pressure"
            );
        }

        Ok(report)
    }
}

impl Cache {
    /// Run one disk-pressure check now
    ///
    /// Does nothing when eviction is disabled. Fails only if disk usage
    /// cannot be sampled.
    pub async fn enforce_disk_limits(&self) -> Result<EvictionReport> {
        self.inner.enforce_disk_limits().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(total: u64, used: u64, free: u64) -> DiskUsage {
        DiskUsage::new(total, used, free)
    }

    #[test]
    fn test_no_thresholds_no_release() {
        let options = CacheOptions::new("/c")
            .with_max_usage_percent(0.0)
            .with_min_free_space(0);
        assert_eq!(bytes_to_release(&options, &usage(100, 99, 1)), 0);
    }

    #[test]
    fn test_min_free_space_deficit() {
        let options = CacheOptions::new("/c")
            .with_max_usage_percent(0.0)
            .with_min_free_space(300);
        assert_eq!(bytes_to_release(&options, &usage(1000, 800, 200)), 100);
        assert_eq!(bytes_to_release(&options, &usage(1000, 700, 300)), 0);
    }

    #[test]
    fn test_usage_percent_deficit() {
        let options = CacheOptions::new("/c").with_max_usage_percent(50.0);
        // 80% used; ceiling is 500 of 1000
        assert_eq!(bytes_to_release(&options, &usage(1000, 800, 200)), 300);
        assert_eq!(bytes_to_release(&options, &usage(1000, 400, 600)), 0);
    }

    #[test]
    fn test_larger_deficit_wins() {
        let options = CacheOptions::new("/c")
            .with_max_usage_percent(50.0)
            .with_min_free_space(700);
        // free deficit 500, percent deficit 300
        assert_eq!(bytes_to_release(&options, &usage(1000, 800, 200)), 500);

        let options = options.with_min_free_space(250);
        assert_eq!(bytes_to_release(&options, &usage(1000, 800, 200)), 300);
    }
}
