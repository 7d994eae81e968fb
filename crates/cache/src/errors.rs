//! Error handling for the disk cache
//!
//! Every failure carries a [`RecoveryHint`] so callers can decide whether to
//! retry, treat the condition as a cache miss, or fix their configuration.

mod conversions;
mod recovery;
mod types;

pub use types::*;
