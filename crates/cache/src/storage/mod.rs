//! Storage layer: payload files and the compression applied to them

pub mod compression;
mod files;

pub use compression::{create_compression, Compression, CompressionKind, Gzip, Identity};
pub use files::FileStore;
