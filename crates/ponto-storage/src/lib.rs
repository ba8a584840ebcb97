#![deny(missing_docs)]

//! # ponto-storage — Byte-Addressable Artifact Storage
//!
//! Generated file payloads, detached signatures, and certificate
//! containers are opaque byte artifacts addressed by a relative path. The
//! [`ByteStore`] trait is the seam between the generation/certificate
//! layers and physical storage; [`FsByteStore`] is the filesystem backend.
//!
//! ## Deletion Semantics
//!
//! Deletion is best-effort by contract: deleting a path that does not
//! exist is not an error. The metadata row is the source of truth; a
//! stray physical file with no row is garbage, not corruption.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from artifact storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The artifact path escapes the store root.
    #[error("invalid artifact path: {0:?}")]
    InvalidPath(String),

    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte-addressable storage for opaque artifacts.
///
/// Implementations must be `Send + Sync`; the engine holds one store for
/// the lifetime of the process.
pub trait ByteStore: Send + Sync {
    /// Write an artifact, replacing any existing bytes at the path.
    fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read an artifact. `None` when the path does not exist.
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Whether an artifact exists at the path.
    fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete an artifact. Returns `false` (not an error) when the path
    /// did not exist.
    fn delete(&self, path: &str) -> Result<bool, StorageError>;
}

/// Filesystem-backed artifact store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FsByteStore {
    base_dir: PathBuf,
}

impl FsByteStore {
    /// Create a store rooted at the given directory. The directory is
    /// created on the first write, not here.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The store's root directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a relative artifact path, rejecting traversal components.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        if path.is_empty() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        let relative = Path::new(path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.base_dir.join(relative))
    }
}

impl ByteStore for FsByteStore {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, bytes)?;
        Ok(())
    }

    fn get(&self, path: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let full = self.resolve(path)?;
        match fs::read(full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.resolve(path)?.exists())
    }

    fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        match fs::remove_file(full) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
