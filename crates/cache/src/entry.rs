//! Metadata tracked in memory for every cached key

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Per-entry time-to-live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ttl {
    /// Never expires, regardless of the cache-wide default
    Never,
    /// Defer to the cache-wide default TTL
    #[default]
    Default,
    /// Expire this long after insertion
    After(Duration),
}

impl Ttl {
    /// Resolve against the cache-wide default; `None` means no expiration
    pub fn effective(self, default_ttl: Option<Duration>) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::Default => default_ttl,
            Self::After(duration) => Some(duration),
        }
    }
}

/// A zero duration selects the cache-wide default
impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        if duration.is_zero() {
            Self::Default
        } else {
            Self::After(duration)
        }
    }
}

/// `None` never expires
impl From<Option<Duration>> for Ttl {
    fn from(duration: Option<Duration>) -> Self {
        match duration {
            Some(duration) => duration.into(),
            None => Self::Never,
        }
    }
}

/// Metadata for one cached key. Replaced wholesale on every `set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    /// Size of the payload as written to disk
    pub compressed_size: u64,
    pub inserted_at: SystemTime,
    pub ttl: Ttl,
    /// Insertion generation; strictly increasing across the cache lifetime
    pub sequence: u64,
}

impl Entry {
    /// Absolute expiry time, if any
    pub fn expires_at(&self, default_ttl: Option<Duration>) -> Option<SystemTime> {
        self.ttl
            .effective(default_ttl)
            .and_then(|ttl| self.inserted_at.checked_add(ttl))
    }

    /// Expired entries are those whose expiry is strictly before `now`
    pub fn is_expired(&self, default_ttl: Option<Duration>, now: SystemTime) -> bool {
        match self.expires_at(default_ttl) {
            Some(expires_at) => expires_at < now,
            None => false,
        }
    }
}
