//! Cache tests
//!
//! `basic` drives every controller by hand with all polling periods set to
//! zero; `advanced` lets the background controllers run on short periods.

mod advanced;

use crate::config::CacheOptions;
use crate::disk_usage::{DiskUsage, DiskUsageProbe};
use crate::storage::CompressionKind;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub(super) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Options with every background controller disabled
pub(super) fn manual_options(root: &Path) -> CacheOptions {
    init_tracing();
    CacheOptions::new(root)
        .with_compression(CompressionKind::None)
        .with_max_usage_percent(0.0)
        .with_check_orphans_period(Duration::ZERO)
        .with_check_evictions_period(Duration::ZERO)
        .with_check_ttl_period(Duration::ZERO)
}

/// A volume of `total` bytes where everything except the cache files is
/// `baseline` bytes of foreign data
#[derive(Debug)]
pub(super) struct DirSizeProbe {
    pub root: PathBuf,
    pub total: u64,
    pub baseline: u64,
}

impl DiskUsageProbe for DirSizeProbe {
    fn usage(&self, _path: &Path) -> std::io::Result<DiskUsage> {
        let mut cached = 0;
        for entry in std::fs::read_dir(&self.root)? {
            let metadata = entry?.metadata()?;
            if metadata.is_file() {
                cached += metadata.len();
            }
        }
        let used = self.baseline + cached;
        let free = self.total.saturating_sub(used);
        Ok(DiskUsage::new(self.total, used, free))
    }
}

/// Replays fixed samples; `None` is a failed query. The last sample repeats.
#[derive(Debug)]
pub(super) struct ScriptedProbe {
    samples: Mutex<VecDeque<Option<DiskUsage>>>,
    pub calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(samples: Vec<Option<DiskUsage>>) -> Self {
        Self {
            samples: Mutex::new(samples.into()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl DiskUsageProbe for ScriptedProbe {
    fn usage(&self, _path: &Path) -> std::io::Result<DiskUsage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut samples = self.samples.lock();
        let sample = if samples.len() > 1 {
            samples.pop_front().flatten()
        } else {
            samples.front().copied().flatten()
        };
        sample.ok_or_else(|| std::io::Error::other("statvfs failed"))
    }
}

/// Poll `check` until it holds or five seconds pass
pub(super) async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
