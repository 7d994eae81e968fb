//! Disk cache implementation
//!
//! The façade owns the index and the file store and runs three background
//! controllers against them:
//! - TTL sweep removes entries past their expiry
//! - disk-pressure eviction removes the oldest entries while the volume is
//!   over its configured limits
//! - orphan reconciliation removes files the index does not know about
//!
//! Foreground calls and controllers only coordinate through the index lock;
//! storage I/O is never performed while holding it.

pub mod index;
pub mod internal;

// Private modules
mod builder;
mod cleanup;
mod eviction;
mod operations;
mod types;

pub use eviction::EvictionReport;
pub use index::{Index, PendingWrite};
pub use internal::StatsSnapshot;
pub use types::Cache;

#[cfg(test)]
mod tests;
