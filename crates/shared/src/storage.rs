//! Durable key-value storage slots.
//!
//! A slot holds exactly one string blob under a fixed key. The watchlist store
//! is written against the [`StorageSlot`] trait so it can run on a file in the
//! data directory or on an in-process slot.

use crate::paths::DataPaths;
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failures a slot reports without an underlying I/O error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage slot '{key}' is unavailable")]
    Unavailable { key: String },

    #[error("storage slot '{key}' is full")]
    QuotaExceeded { key: String },
}

/// A single named blob in durable storage
pub trait StorageSlot {
    /// Key this slot is stored under
    fn key(&self) -> &str;

    /// Read the blob; `Ok(None)` when nothing has been written yet
    fn read(&self) -> Result<Option<String>>;

    /// Overwrite the blob
    fn write(&self, contents: &str) -> Result<()>;
}

/// Slot backed by one JSON file in the data directory
#[derive(Debug, Clone)]
pub struct FileSlot {
    key: String,
    path: PathBuf,
}

impl FileSlot {
    /// Slot for `key` under `<data>/storage/`
    pub fn new(paths: &DataPaths, key: &str) -> Self {
        Self {
            key: key.to_string(),
            path: paths.storage_slot(key),
        }
    }

    /// Slot at an explicit file path
    pub fn at_path(key: &str, path: impl AsRef<Path>) -> Self {
        Self {
            key: key.to_string(),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!(key = %self.key, path = %self.path.display(), "Storage slot empty");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage slot: {}", self.path.display()))?;

        Ok(Some(content))
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }

        // Write to a sibling first so a crash never leaves a truncated slot
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write storage slot: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace storage slot: {}", self.path.display()))?;

        debug!(key = %self.key, bytes = contents.len(), "Storage slot written");
        Ok(())
    }
}

/// In-process slot, lost when dropped
///
/// Reads and writes can be switched to fail, which mimics a browser with
/// storage disabled or over quota.
#[derive(Debug, Default)]
pub struct MemorySlot {
    key: String,
    contents: RefCell<Option<String>>,
    fail_reads: bool,
    fail_writes: bool,
    writes: RefCell<usize>,
}

impl MemorySlot {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// Slot pre-filled with `contents`
    pub fn with_contents(key: &str, contents: impl Into<String>) -> Self {
        let slot = Self::new(key);
        *slot.contents.borrow_mut() = Some(contents.into());
        slot
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Current blob, bypassing failure injection
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl StorageSlot for MemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(StorageError::Unavailable {
                key: self.key.clone(),
            }
            .into());
        }
        Ok(self.contents.borrow().clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded {
                key: self.key.clone(),
            }
            .into());
        }
        *self.contents.borrow_mut() = Some(contents.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

impl<S: StorageSlot + ?Sized> StorageSlot for &S {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<()> {
        (**self).write(contents)
    }
}

impl<S: StorageSlot + ?Sized> StorageSlot for Box<S> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<()> {
        (**self).write(contents)
    }
}
