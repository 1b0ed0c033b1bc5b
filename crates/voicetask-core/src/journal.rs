//! Append-only task journal.
//!
//! The journal is a single pretty-printed JSON array of [`Task`] records,
//! newest first. Every save rewrites the whole document, which is fine for
//! the handful of tasks one person performs. There is no locking: two
//! concurrent `save_task` calls on the same key race and one update is lost.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{Storage, StorageError};
use crate::task::Task;

/// Storage key of the journal document.
pub const JOURNAL_KEY: &str = "tasks.json";

/// Suffix of the key an unreadable journal is preserved under before it is
/// overwritten. Later backups get `.1`, `.2`, ... appended so none is replaced.
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to serialize task journal: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Totals shown above the task history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct JournalSummary {
    pub total_tasks: usize,
    pub total_duration_sec: u64,
}

impl JournalSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            total_tasks: tasks.len(),
            total_duration_sec: tasks.iter().map(|t| u64::from(t.duration_sec())).sum(),
        }
    }
}

/// What was found under the journal key.
enum JournalDocument {
    Missing,
    Parsed(Vec<Task>),
    Corrupt(String),
}

/// Persisted, newest-first collection of completed tasks.
pub struct TaskJournal<S> {
    storage: S,
    key: String,
}

impl<S: Storage> TaskJournal<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: JOURNAL_KEY.to_string(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load every task, newest first.
    ///
    /// Never fails: a missing, unreadable or unparsable journal loads as empty.
    pub async fn load_all(&self) -> Vec<Task> {
        match self.storage.read_text(&self.key).await {
            Ok(content) => match parse(content) {
                JournalDocument::Parsed(tasks) => tasks,
                JournalDocument::Missing => Vec::new(),
                JournalDocument::Corrupt(_) => {
                    warn!(key = %self.key, "task journal is not valid JSON; treating as empty");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(error = %err, "failed to read task journal; treating as empty");
                Vec::new()
            }
        }
    }

    /// Insert `task` at the head of the journal and rewrite the document.
    ///
    /// Read and write failures propagate: the task is not saved. An existing
    /// document that cannot be parsed is copied to the first free backup key
    /// (`<key>.corrupt`, then `<key>.corrupt.1`, ...) before the journal is
    /// restarted with `task` as its only entry.
    pub async fn save_task(&self, task: Task) -> Result<(), JournalError> {
        let content = self.storage.read_text(&self.key).await?;
        let mut tasks = match parse(content) {
            JournalDocument::Missing => Vec::new(),
            JournalDocument::Parsed(tasks) => tasks,
            JournalDocument::Corrupt(raw) => {
                let backup_key = self.free_backup_key().await?;
                warn!(
                    key = %self.key,
                    backup = %backup_key,
                    "preserving unreadable task journal before overwriting"
                );
                self.storage.write_text(&backup_key, &raw).await?;
                Vec::new()
            }
        };

        debug!(id = %task.id(), task_type = %task.task_type(), "saving task");
        tasks.insert(0, task);

        let document = serde_json::to_string_pretty(&tasks)?;
        self.storage.write_text(&self.key, &document).await?;
        Ok(())
    }

    /// First corrupt-backup key with no document stored under it.
    async fn free_backup_key(&self) -> Result<String, JournalError> {
        let base = format!("{}{}", self.key, CORRUPT_BACKUP_SUFFIX);
        let mut candidate = base.clone();
        let mut n = 0u32;
        while self.storage.read_text(&candidate).await?.is_some() {
            n += 1;
            candidate = format!("{base}.{n}");
        }
        Ok(candidate)
    }

    /// Task count and total recorded seconds.
    pub async fn summary(&self) -> JournalSummary {
        JournalSummary::from_tasks(&self.load_all().await)
    }
}

fn parse(content: Option<String>) -> JournalDocument {
    match content {
        None => JournalDocument::Missing,
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(tasks) => JournalDocument::Parsed(tasks),
            Err(_) => JournalDocument::Corrupt(raw),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Recording;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::path::PathBuf;

    fn recording(duration_sec: u32) -> Recording {
        Recording {
            path: format!("/tmp/voicetask_audio_{duration_sec}.wav"),
            duration_sec,
        }
    }

    /// Storage whose reads or writes always fail.
    struct BrokenStorage {
        fail_reads: bool,
    }

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn read_text(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                Err(StorageError::io(key, std::io::Error::other("device lost")))
            } else {
                Ok(None)
            }
        }

        async fn write_text(&self, key: &str, _content: &str) -> Result<(), StorageError> {
            Err(StorageError::io(key, std::io::Error::other("read-only filesystem")))
        }

        fn resolve_path(&self, key: &str) -> PathBuf {
            PathBuf::from(key)
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty() {
        let journal = TaskJournal::new(MemoryStorage::new());
        assert!(journal.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_newest_first() {
        let journal = TaskJournal::new(MemoryStorage::new());
        let a = Task::text_reading("first", recording(11));
        let b = Task::image_description("https://example.com/b.jpg", recording(12));

        journal.save_task(a.clone()).await.unwrap();
        journal.save_task(b.clone()).await.unwrap();

        assert_eq!(journal.load_all().await, vec![b, a]);
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let journal = TaskJournal::new(MemoryStorage::new());
        journal
            .save_task(Task::photo_capture("/tmp/JPEG_1.jpg", None))
            .await
            .unwrap();

        assert_eq!(journal.load_all().await, journal.load_all().await);
    }

    #[tokio::test]
    async fn test_document_is_pretty_printed_array() {
        let journal = TaskJournal::new(MemoryStorage::new());
        journal
            .save_task(Task::text_reading("hello", recording(14)))
            .await
            .unwrap();

        let raw = journal.storage().document(JOURNAL_KEY).unwrap();
        assert!(raw.starts_with("[\n"));
        assert!(raw.contains("\"task_type\": \"text_reading\""));
    }

    #[tokio::test]
    async fn test_corrupt_journal_loads_empty() {
        let storage = MemoryStorage::new().with_document(JOURNAL_KEY, "{not json");
        let journal = TaskJournal::new(storage);
        assert!(journal.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_journal_is_backed_up_before_overwrite() {
        let storage = MemoryStorage::new().with_document(JOURNAL_KEY, "{not json");
        let journal = TaskJournal::new(storage);
        let task = Task::text_reading("hello", recording(14));

        journal.save_task(task.clone()).await.unwrap();

        assert_eq!(journal.load_all().await, vec![task]);
        assert_eq!(
            journal.storage().document("tasks.json.corrupt").as_deref(),
            Some("{not json")
        );
    }

    #[tokio::test]
    async fn test_repeated_corruption_keeps_every_backup() {
        let storage = MemoryStorage::new().with_document(JOURNAL_KEY, "FIRST-CORRUPT");
        let journal = TaskJournal::new(storage);

        journal
            .save_task(Task::text_reading("a", recording(11)))
            .await
            .unwrap();
        journal
            .storage()
            .write_text(JOURNAL_KEY, "SECOND-CORRUPT")
            .await
            .unwrap();
        journal
            .save_task(Task::text_reading("b", recording(12)))
            .await
            .unwrap();

        assert_eq!(
            journal.storage().document("tasks.json.corrupt").as_deref(),
            Some("FIRST-CORRUPT")
        );
        assert_eq!(
            journal.storage().document("tasks.json.corrupt.1").as_deref(),
            Some("SECOND-CORRUPT")
        );
        assert_eq!(journal.load_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_loads_empty() {
        let journal = TaskJournal::new(BrokenStorage { fail_reads: true });
        assert!(journal.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let journal = TaskJournal::new(BrokenStorage { fail_reads: false });
        let err = journal
            .save_task(Task::text_reading("hello", recording(14)))
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Storage(_)));
    }

    #[tokio::test]
    async fn test_read_failure_blocks_save() {
        let journal = TaskJournal::new(BrokenStorage { fail_reads: true });
        assert!(
            journal
                .save_task(Task::text_reading("hello", recording(14)))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_summary_totals() {
        let journal = TaskJournal::new(MemoryStorage::new());
        journal
            .save_task(Task::text_reading("a", recording(12)))
            .await
            .unwrap();
        journal
            .save_task(Task::photo_capture("/tmp/JPEG_1.jpg", None))
            .await
            .unwrap();
        journal
            .save_task(Task::image_description("https://example.com/c.jpg", recording(18)))
            .await
            .unwrap();

        assert_eq!(
            journal.summary().await,
            JournalSummary {
                total_tasks: 3,
                total_duration_sec: 30,
            }
        );
    }
}
