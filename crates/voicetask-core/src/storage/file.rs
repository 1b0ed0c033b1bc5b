//! Directory-backed storage: one file per key.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{Storage, StorageError};

/// Stores each document as `<root>/<key>`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read_text(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.resolve_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    async fn write_text(&self, key: &str, content: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::io(key, e))?;
        tokio::fs::write(self.resolve_path(key), content)
            .await
            .map_err(|e| StorageError::io(key, e))
    }

    fn resolve_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.read_text("tasks.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_creates_root_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("data"));

        storage.write_text("tasks.json", "[]").await.unwrap();

        assert_eq!(
            storage.read_text("tasks.json").await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(storage.resolve_path("tasks.json").is_file());
    }

    #[tokio::test]
    async fn test_read_error_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the document should be cannot be read as text
        std::fs::create_dir(dir.path().join("tasks.json")).unwrap();
        let storage = FileStorage::new(dir.path());

        let err = storage.read_text("tasks.json").await.unwrap_err();
        assert!(err.to_string().contains("tasks.json"));
    }
}
