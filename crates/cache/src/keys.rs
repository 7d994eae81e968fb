//! Cache key validation
//!
//! Keys are used verbatim as file names directly under the cache root, so
//! anything that could escape the root or name a directory is rejected.

use crate::errors::{CacheError, RecoveryHint, Result};

/// Longest key accepted; most filesystems cap a path component at 255 bytes
pub const MAX_KEY_LEN: usize = 255;

/// Prefix reserved for the cache's own bookkeeping entries under the root
pub const RESERVED_PREFIX: &str = ".staging";

/// Validate a key before it touches storage
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        Some("key must not be empty")
    } else if key.len() > MAX_KEY_LEN {
        Some("key exceeds 255 bytes")
    } else if key == "." || key == ".." {
        Some("key must not be a relative path component")
    } else if key.contains(['/', '\\']) {
        Some("key must not contain path separators")
    } else if key.contains('\0') {
        Some("key must not contain NUL bytes")
    } else if key.starts_with(RESERVED_PREFIX) {
        Some("key uses a reserved prefix")
    } else {
        None
    };

    match reason {
        None => Ok(()),
        Some(reason) => Err(CacheError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Use a plain file name without separators".to_string(),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        for key in ["a", "user-42", "thumb.png", "..hidden", "ünïcode"] {
            assert!(validate_key(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn test_rejects_traversal_and_separators() {
        let long = "x".repeat(MAX_KEY_LEN + 1);
        let invalid = [
            "",
            ".",
            "..",
            "../etc/passwd",
            "a/b",
            "a\\b",
            "nul\0byte",
            ".staging",
            long.as_str(),
        ];
        for key in invalid {
            let err = validate_key(key).unwrap_err();
            assert!(matches!(err, CacheError::InvalidKey { .. }), "{key:?}");
        }
    }
}
