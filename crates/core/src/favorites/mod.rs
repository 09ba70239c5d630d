//! Persisted favorites.
//!
//! The favorites set lives in a key-value store under one fixed key per
//! schema version. Storage failures never reach the caller: a set that cannot
//! be read is empty and a set that cannot be written stays in memory.

mod file;
mod memory;
mod set;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use set::FavoritesSet;

use thiserror::Error;

/// Errors from a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Minimal string key-value storage, the shape of per-browser local storage.
pub trait KeyValueStorage: Send + Sync {
    /// Get the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
