//! One file per key directly under the cache root
//!
//! Payloads are written to a staging directory first and renamed into
//! place, so readers only ever see complete files.

use crate::errors::{CacheError, Result};
use crate::keys::RESERVED_PREFIX;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

/// Filesystem accessor for cache payloads
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    staging: PathBuf,
    next_staging_id: AtomicU64,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        let staging = root.join(RESERVED_PREFIX);
        Self {
            root,
            staging,
            next_staging_id: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and staging directories and clear stale staging files
    pub async fn prepare(&self) -> Result<()> {
        for dir in [&self.root, &self.staging] {
            if let Err(e) = fs::create_dir_all(dir).await {
                return Err(CacheError::io(dir.clone(), "create cache directory", e));
            }
        }

        let list_error = |e| CacheError::io(self.staging.clone(), "list staging directory", e);
        let mut read_dir = fs::read_dir(&self.staging).await.map_err(list_error)?;

        let mut cleared = 0usize;
        while let Ok(Some(entry)) = read_dir.next_entry().await {
            match fs::remove_file(entry.path()).await {
                Ok(()) => cleared += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Failed to clear staging file"
                    );
                }
            }
        }

        if cleared > 0 {
            tracing::info!(cleared, "Cleared interrupted writes from staging directory");
        }

        Ok(())
    }

    /// Path of the payload file for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Inverse of [`path_for`](Self::path_for); `None` for names that are not valid UTF-8
    pub fn key_for(file_name: &OsStr) -> Option<&str> {
        file_name.to_str()
    }

    /// Write `bytes` as the payload for `key`, replacing any previous payload
    pub async fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let id = self.next_staging_id.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{id:016x}.tmp", std::process::id());
        let staged = self.staging.join(name);
        let target = self.path_for(key);

        if let Err(e) = fs::write(&staged, bytes).await {
            let _ = fs::remove_file(&staged).await;
            return Err(CacheError::io(staged, "write staging file", e));
        }

        if let Err(e) = fs::rename(&staged, &target).await {
            let _ = fs::remove_file(&staged).await;
            return Err(CacheError::io(target, "move cache file into place", e));
        }

        Ok(())
    }

    /// Read the payload for `key`; a missing file is a cache miss
    pub async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CacheError::not_found(key)),
            Err(e) => Err(CacheError::io(path, "read cache file", e)),
        }
    }

    /// Remove the payload for `key`. Returns whether a file was removed;
    /// an already missing file is not an error.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.remove_path(self.path_for(key)).await
    }

    /// Remove a root-level file by its raw name
    pub async fn remove_file_named(&self, file_name: &OsStr) -> Result<bool> {
        self.remove_path(self.root.join(file_name)).await
    }

    async fn remove_path(&self, path: PathBuf) -> Result<bool> {
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io(path, "remove cache file", e)),
        }
    }

    /// Names of regular files directly under the root
    pub async fn list(&self) -> Result<Vec<OsString>> {
        let list_error = |e| CacheError::io(self.root.clone(), "list cache directory", e);
        let mut read_dir = fs::read_dir(&self.root).await.map_err(list_error)?;

        let mut names = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(list_error)? {
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => names.push(entry.file_name()),
                Ok(_) => {}
                // Vanished between listing and stat
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::io(entry.path(), "stat cache file", e)),
            }
        }

        Ok(names)
    }
}
