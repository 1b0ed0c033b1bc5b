//! Text document storage used by the task journal.
//!
//! Path resolution and the actual medium are the backend's concern; the
//! journal only reads and writes whole documents by key.

mod file;
mod memory;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage I/O failure, surfaced to the caller without retrying.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            key: key.into(),
            source,
        }
    }
}

/// Keyed text document store.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the document stored under `key`; `Ok(None)` if it does not exist.
    async fn read_text(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored under `key`.
    async fn write_text(&self, key: &str, content: &str) -> Result<(), StorageError>;

    /// Location a key maps to, for display and for collaborators that need a path.
    fn resolve_path(&self, key: &str) -> PathBuf;
}
