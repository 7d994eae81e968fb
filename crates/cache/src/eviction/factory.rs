//! Factory for creating eviction policies

use crate::errors::{CacheError, RecoveryHint, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::policies::OldestFirstPolicy;
use super::traits::EvictionPolicy;

/// Eviction policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionPolicyKind {
    /// Never evict under disk pressure
    None,
    #[default]
    OldestFirst,
}

impl FromStr for EvictionPolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "oldest-first" | "oldest_first" | "fifo" => Ok(Self::OldestFirst),
            _ => Err(CacheError::Configuration {
                message: format!("Unknown eviction policy: {s}"),
                recovery_hint: RecoveryHint::UseDefault {
                    value: "oldest-first".to_string(),
                },
            }),
        }
    }
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::OldestFirst => f.write_str("oldest-first"),
        }
    }
}

/// Eviction policy factory; `None` selects no policy
pub fn create_eviction_policy(kind: EvictionPolicyKind) -> Option<Box<dyn EvictionPolicy>> {
    match kind {
        EvictionPolicyKind::None => None,
        EvictionPolicyKind::OldestFirst => Some(Box::new(OldestFirstPolicy)),
    }
}
