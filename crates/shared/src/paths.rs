//! File path utilities for the data directory.
//!
//! Layout:
//! - `storage/<key>.json`: one durable storage slot per key
//! - `logs/`: rolling log files

use std::path::{Path, PathBuf};

/// File path manager for data files
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths with the given root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every storage slot
    pub fn storage_dir(&self) -> PathBuf {
        self.root.join("storage")
    }

    /// File backing the storage slot named `key`
    pub fn storage_slot(&self, key: &str) -> PathBuf {
        self.storage_dir()
            .join(format!("{}.json", Self::key_to_filename(key)))
    }

    /// Get logs directory
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Create all necessary directories
    pub fn create_dirs(&self) -> std::io::Result<()> {
        for dir in [self.storage_dir(), self.logs_dir()] {
            std::fs::create_dir_all(&dir)?;
        }

        Ok(())
    }

    /// Sanitize a slot key into a valid filename
    pub fn key_to_filename(key: &str) -> String {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if safe.trim_matches('.').is_empty() {
            "_".to_string()
        } else {
            safe
        }
    }
}
