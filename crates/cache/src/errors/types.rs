//! Core error types for the cache system

use std::path::PathBuf;
use std::time::Duration;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Re-export CacheError as Error for convenience
pub use CacheError as Error;

/// Error type for cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Key is absent, expired, evicted, or its file vanished mid-read
    #[error("cache key '{key}' not found")]
    NotFound {
        key: String,
        recovery_hint: RecoveryHint,
    },

    /// Read, write or remove failure below the index layer
    #[error("I/O error during {operation} on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Stored bytes are not valid for the configured compression scheme
    #[error("corrupt {scheme} payload: {source}")]
    CorruptPayload {
        scheme: &'static str,
        #[source]
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Compressing a value failed before it reached storage
    #[error("{scheme} compression failed: {source}")]
    Compression {
        scheme: &'static str,
        #[source]
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Disk usage for the cache root could not be queried
    #[error("disk usage unavailable for '{}': {source}", .path.display())]
    DiskUsageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Configuration rejected at construction time
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },

    /// Key cannot be used as a file name under the cache root
    #[error("invalid cache key '{key}': {reason}")]
    InvalidKey {
        key: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryHint {
    /// Retry the operation after a delay
    Retry { after: Duration },

    /// Treat as a cache miss and recompute the value
    Recompute,

    /// Check file permissions
    CheckPermissions { path: PathBuf },

    /// Check disk space and clean up if needed
    CheckDiskSpace,

    /// Use a default value
    UseDefault { value: String },

    /// Update cache configuration
    UpdateConfiguration,

    /// Remove the entry and write it again
    ClearAndRetry,

    /// Recreate cache file/directory
    Recreate,

    /// Contact system administrator
    ContactAdmin,

    /// No automated recovery possible
    Manual { instructions: String },
}
