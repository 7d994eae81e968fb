//! Error conversion utilities

use super::types::{CacheError, RecoveryHint};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

impl CacheError {
    /// Build a not-found error for `key`
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound {
            key: key.into(),
            recovery_hint: RecoveryHint::Recompute,
        }
    }

    /// Build a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        }
    }

    /// Wrap an I/O error with the path and operation it came from
    pub fn io(path: PathBuf, operation: &'static str, source: std::io::Error) -> Self {
        let recovery_hint = match source.kind() {
            ErrorKind::PermissionDenied => RecoveryHint::CheckPermissions { path: path.clone() },
            ErrorKind::NotFound => RecoveryHint::Recreate,
            ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
                RecoveryHint::Retry {
                    after: Duration::from_millis(100),
                }
            }
            ErrorKind::StorageFull => RecoveryHint::CheckDiskSpace,
            _ => RecoveryHint::ContactAdmin,
        };

        Self::Io {
            path,
            operation,
            source,
            recovery_hint,
        }
    }
}

/// Config files are JSON; parse failures are configuration errors
impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        Self::Configuration {
            message: format!("invalid configuration file: {error}"),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check config file syntax".to_string(),
            },
        }
    }
}
