//! Background controller task management

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::core::types::{Cache, CacheInner};

/// Spawn the TTL, eviction and orphan controllers for `cache`
pub fn start_controllers(cache: &Cache) {
    let options = &cache.inner.options;
    let mut handles = Vec::with_capacity(3);

    let purge = |inner: Arc<CacheInner>| async move {
        inner.purge_expired_at(SystemTime::now()).await;
    };
    let period = options.check_ttl_period;
    handles.extend(spawn_controller(cache, "ttl", period, purge));

    if cache.inner.eviction_policy.is_some() {
        let evict = |inner: Arc<CacheInner>| async move {
            if let Err(e) = inner.enforce_disk_limits().await {
                tracing::warn!(error = %e, "Eviction check abandoned");
            }
        };
        let period = options.check_evictions_period;
        handles.extend(spawn_controller(cache, "eviction", period, evict));
    }

    let reconcile = |inner: Arc<CacheInner>| async move {
        if let Err(e) = inner.remove_orphans().await {
            tracing::warn!(error = %e, "Orphan check failed");
        }
    };
    let period = options.check_orphans_period;
    handles.extend(spawn_controller(cache, "orphans", period, reconcile));

    cache.inner.controllers.lock().extend(handles);
}

/// Run `tick` every `period` until the cache is closed or dropped
///
/// The task only holds a weak reference between ticks, so it never keeps
/// the cache alive. A zero period disables the controller.
fn spawn_controller<F, Fut>(
    cache: &Cache,
    name: &'static str,
    period: Duration,
    tick: F,
) -> Option<tokio::task::JoinHandle<()>>
where
    F: Fn(Arc<CacheInner>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    if period.is_zero() {
        tracing::debug!(controller = name, "Controller disabled");
        return None;
    }

    let weak = Arc::downgrade(&cache.inner);
    let mut shutdown = cache.inner.shutdown.subscribe();

    Some(tokio::spawn(async move {
        loop {
            match weak.upgrade() {
                Some(inner) if inner.is_alive() => tick(inner).await,
                _ => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(period) => {}
                _ = shutdown.changed() => {}
            }
        }

        tracing::debug!(controller = name, "Controller stopped");
    }))
}
