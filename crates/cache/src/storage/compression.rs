//! Compression strategies applied to values before they reach storage
//!
//! The strategy is chosen once per cache and is not recorded per entry.
//! Opening an existing directory with a different strategy makes the old
//! entries unreadable; `get` reports them as corrupt.

use crate::errors::{CacheError, RecoveryHint, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// Symmetric transform between caller values and stored payloads
pub trait Compression: Send + Sync + fmt::Debug {
    /// Short scheme name used in errors and logs
    fn scheme(&self) -> &'static str;

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Compression selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    /// Byte-for-byte passthrough
    None,
    /// Deflate in a gzip container
    #[default]
    Gzip,
}

impl FromStr for CompressionKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "identity" => Ok(Self::None),
            "gzip" => Ok(Self::Gzip),
            _ => Err(CacheError::Configuration {
                message: format!("Unknown compression: {s}"),
                recovery_hint: RecoveryHint::UseDefault {
                    value: "gzip".to_string(),
                },
            }),
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Gzip => f.write_str("gzip"),
        }
    }
}

/// Build the strategy for a selector
pub fn create_compression(kind: CompressionKind) -> Box<dyn Compression> {
    match kind {
        CompressionKind::None => Box::new(Identity),
        CompressionKind::Gzip => Box::new(Gzip),
    }
}

/// Passthrough strategy; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Compression for Identity {
    fn scheme(&self) -> &'static str {
        "identity"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}

/// Gzip strategy backed by flate2
///
/// Concatenated members decode as one payload; anything after the last
/// member that is not a gzip header is corrupt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gzip;

impl Compression for Gzip {
    fn scheme(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(input.len() / 2 + 32),
            flate2::Compression::default(),
        );
        let written = encoder.write_all(input);
        match written.and_then(|()| encoder.finish()) {
            Ok(output) => Ok(output),
            Err(source) => Err(CacheError::Compression {
                scheme: self.scheme(),
                source,
                recovery_hint: RecoveryHint::ContactAdmin,
            }),
        }
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = MultiGzDecoder::new(input);
        let mut output = Vec::with_capacity(input.len() * 2);
        match decoder.read_to_end(&mut output) {
            Ok(_) => Ok(output),
            Err(source) => Err(CacheError::CorruptPayload {
                scheme: self.scheme(),
                source,
                recovery_hint: RecoveryHint::ClearAndRetry,
            }),
        }
    }
}
