//! Background controller and concurrency tests

use super::{eventually, manual_options, DirSizeProbe};
use crate::core::Cache;
use crate::entry::Ttl;
use crate::errors::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const TICK: Duration = Duration::from_millis(20);

#[tokio::test]
async fn test_background_ttl_sweep() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let options = manual_options(temp_dir.path()).with_check_ttl_period(TICK);
    let cache = Cache::new(options).await?;

    cache.set("short", b"v", Duration::from_millis(50)).await?;
    cache.set("long", b"v", Ttl::Never).await?;

    let expired = eventually(|| {
        let cache = cache.clone();
        async move { !cache.contains("short") }
    })
    .await;
    assert!(expired);
    assert!(!temp_dir.path().join("short").exists());
    assert!(cache.contains("long"));
    Ok(())
}

#[tokio::test]
async fn test_background_orphan_reconciliation() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let options = manual_options(temp_dir.path()).with_check_orphans_period(TICK);
    let cache = Cache::new(options).await?;

    cache.set("registered", b"v", Ttl::Never).await?;
    let stray = temp_dir.path().join("stray");
    std::fs::write(&stray, b"left by a crash").unwrap();

    let removed = eventually(|| {
        let stray = stray.clone();
        async move { !stray.exists() }
    })
    .await;
    assert!(removed);

    // Give the controller a few more periods to prove it leaves tracked files alone
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(cache.get("registered").await?, b"v");
    Ok(())
}

#[tokio::test]
async fn test_background_eviction() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let probe = Arc::new(DirSizeProbe {
        root: temp_dir.path().to_path_buf(),
        total: 10_000,
        baseline: 0,
    });
    let options = manual_options(temp_dir.path())
        .with_max_usage_percent(5.0)
        .with_check_evictions_period(TICK);
    let cache = Cache::with_probe(options, probe).await?;

    // 3 x 200 bytes is 6% of the volume; one eviction brings it to 4%
    for key in ["first", "second", "third"] {
        cache.set(key, &[7u8; 200], Ttl::Never).await?;
    }

    let evicted = eventually(|| {
        let cache = cache.clone();
        async move { !cache.contains("first") }
    })
    .await;
    assert!(evicted);

    tokio::time::sleep(TICK * 3).await;
    assert!(cache.contains("second"));
    assert!(cache.contains("third"));
    assert!(cache.last_disk_usage().is_some());
    Ok(())
}

#[tokio::test]
async fn test_close_stops_controllers() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let options = manual_options(temp_dir.path())
        .with_check_orphans_period(Duration::from_millis(10))
        .with_check_ttl_period(Duration::from_secs(3600));
    let cache = Cache::new(options).await?;

    cache.close();
    assert!(cache.is_closed());
    cache.close();

    tokio::time::sleep(Duration::from_millis(50)).await;
    let stray = temp_dir.path().join("stray");
    std::fs::write(&stray, b"x").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(stray.exists());

    // Foreground operations keep working after close
    cache.set("k", b"v", Ttl::Default).await?;
    assert_eq!(cache.get("k").await?, b"v");

    // The TTL controller is asleep for an hour; close must wake it
    let handles: Vec<_> = cache.inner.controllers.lock().drain(..).collect();
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("controller did not stop after close")
            .unwrap();
    }
    Ok(())
}

#[tokio::test]
async fn test_drop_stops_controllers() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let period = Duration::from_millis(10);
    let options = manual_options(temp_dir.path()).with_check_orphans_period(period);
    let cache = Cache::new(options).await?;
    drop(cache);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let stray = temp_dir.path().join("stray");
    std::fs::write(&stray, b"x").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(stray.exists());
    Ok(())
}

fn untracked_files(cache: &Cache, root: &Path) -> Vec<String> {
    std::fs::read_dir(root)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !cache.contains(name))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operations_with_controllers() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let options = manual_options(temp_dir.path())
        .with_check_orphans_period(Duration::from_millis(5))
        .with_check_ttl_period(Duration::from_millis(5));
    let cache = Cache::new(options).await?;

    let mut workers = Vec::new();
    for worker in 0..8u32 {
        let cache = cache.clone();
        workers.push(tokio::spawn(async move {
            for i in 0..100u32 {
                let key = format!("key-{}", (worker * 7 + i) % 16);
                let value = format!("{worker}:{i}").into_bytes();
                match i % 5 {
                    0 | 1 => cache.set(&key, &value, Duration::from_millis(30)).await?,
                    2 | 3 => {
                        if let Err(e) = cache.get(&key).await {
                            assert!(e.is_not_found(), "unexpected error: {e}");
                        }
                    }
                    _ => {
                        cache.delete(&key).await?;
                    }
                }
            }
            Ok::<(), crate::errors::CacheError>(())
        }));
    }

    for worker in workers {
        worker.await.unwrap()?;
    }

    cache.close();
    let controllers: Vec<_> = cache.inner.controllers.lock().drain(..).collect();
    for handle in controllers {
        handle.await.unwrap();
    }

    cache.remove_orphans().await?;
    assert!(untracked_files(&cache, temp_dir.path()).is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fresh_keys_survive_running_orphan_controller() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let period = Duration::from_millis(1);
    let options = manual_options(temp_dir.path()).with_check_orphans_period(period);
    let cache = Cache::new(options).await?;

    for i in 0..200 {
        let key = format!("k{i}");
        cache.set(&key, b"payload", Ttl::Never).await?;
        assert_eq!(cache.get(&key).await?, b"payload");
    }
    Ok(())
}
