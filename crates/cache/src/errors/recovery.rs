//! Recovery utilities for cache errors

use super::types::{CacheError, RecoveryHint};

impl CacheError {
    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::NotFound { recovery_hint, .. }
            | Self::Io { recovery_hint, .. }
            | Self::CorruptPayload { recovery_hint, .. }
            | Self::Compression { recovery_hint, .. }
            | Self::DiskUsageUnavailable { recovery_hint, .. }
            | Self::Configuration { recovery_hint, .. }
            | Self::InvalidKey { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Check if this error is a cache miss
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is transient and can be retried
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self.recovery_hint(),
            RecoveryHint::Retry { .. } | RecoveryHint::CheckDiskSpace
        )
    }

    /// Check if this error indicates data corruption
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptPayload { .. })
    }
}
