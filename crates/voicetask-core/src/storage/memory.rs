//! In-memory storage for tests and previews.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use super::{Storage, StorageError};

/// Keeps documents in a map; nothing touches the disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, e.g. to simulate an existing or corrupt journal.
    pub fn with_document(self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.lock().insert(key.into(), content.into());
        self
    }

    /// Current content of a document, bypassing the async interface.
    pub fn document(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read_text(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.document(key))
    }

    async fn write_text(&self, key: &str, content: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), content.to_string());
        Ok(())
    }

    fn resolve_path(&self, key: &str) -> PathBuf {
        PathBuf::from(key)
    }
}
