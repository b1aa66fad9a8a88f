//! Shared library for the NimeStream client.
//!
//! This crate provides common functionality used by the gateway and the client:
//! - Configuration management
//! - Logging infrastructure
//! - Data models (watchlist entries and remote DTOs)
//! - Data directory layout
//! - Locator normalization
//! - Durable storage slots and the watchlist store

pub mod config;
pub mod locator;
pub mod logging;
pub mod models;
pub mod paths;
pub mod storage;
pub mod watchlist;

// Re-export commonly used types
pub use config::Config;
pub use locator::extract_path;
pub use logging::LogConfig;
pub use models::*;
pub use paths::DataPaths;
pub use storage::{FileSlot, MemorySlot, StorageError, StorageSlot};
pub use watchlist::WatchlistStore;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
