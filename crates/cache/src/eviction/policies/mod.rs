//! Eviction policy implementations

mod oldest_first;

pub use oldest_first::OldestFirstPolicy;
