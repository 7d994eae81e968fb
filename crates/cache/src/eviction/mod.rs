//! Eviction policies for disk-pressure eviction
//!
//! A policy only decides which entry goes next; the controller loop that
//! measures disk usage and removes files lives in `core::eviction`.

mod factory;
mod policies;
mod traits;

// Re-export public API
pub use factory::{create_eviction_policy, EvictionPolicyKind};
pub use policies::OldestFirstPolicy;
pub use traits::EvictionPolicy;

#[cfg(test)]
mod tests;
