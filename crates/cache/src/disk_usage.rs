//! Disk usage sampling for the eviction controller

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Point-in-time usage of the volume holding a directory
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    /// Bytes available to unprivileged writers
    pub free_bytes: u64,
    pub used_percent: f64,
}

impl DiskUsage {
    /// Build a sample; the percentage is relative to space usable by the cache
    pub fn new(total_bytes: u64, used_bytes: u64, free_bytes: u64) -> Self {
        let usable = used_bytes.saturating_add(free_bytes);
        let used_percent = if usable == 0 {
            0.0
        } else {
            used_bytes as f64 / usable as f64 * 100.0
        };

        Self {
            total_bytes,
            used_bytes,
            free_bytes,
            used_percent,
        }
    }
}

/// Source of disk usage samples
pub trait DiskUsageProbe: Send + Sync + fmt::Debug {
    fn usage(&self, path: &Path) -> std::io::Result<DiskUsage>;
}

/// Probe backed by `statvfs` (or `GetDiskFreeSpaceEx` on Windows) via fs2
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProbe;

impl DiskUsageProbe for StatvfsProbe {
    fn usage(&self, path: &Path) -> std::io::Result<DiskUsage> {
        let stats = fs2::statvfs(path)?;
        let total = stats.total_space();
        let used = total.saturating_sub(stats.free_space());
        Ok(DiskUsage::new(total, used, stats.available_space()))
    }
}
