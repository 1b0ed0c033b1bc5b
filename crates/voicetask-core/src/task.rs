//! Task records persisted to the journal.
//!
//! A [`Task`] is one completed unit of work: a reading, an image description,
//! or a captured photo, paired with the voice recording made for it. Records
//! are immutable once constructed; the constructors are the only way to build
//! one, so the task type always matches the content field that is filled in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::audio::Recording;

/// Kind of task a record was produced by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    TextReading,
    ImageDescription,
    PhotoCapture,
}

impl TaskType {
    /// Get the string identifier for this task type
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::TextReading => "text_reading",
            TaskType::ImageDescription => "image_description",
            TaskType::PhotoCapture => "photo_capture",
        }
    }

    /// Human-readable name for menus and history output
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskType::TextReading => "Text Reading",
            TaskType::ImageDescription => "Image Description",
            TaskType::PhotoCapture => "Photo Capture",
        }
    }

    /// File name prefix for audio recorded during this kind of task
    pub fn audio_prefix(&self) -> &'static str {
        match self {
            TaskType::TextReading => "voicetask_audio",
            TaskType::ImageDescription => "voicetask_desc",
            TaskType::PhotoCapture => "voicetask_photo_audio",
        }
    }

    /// List all task types
    pub fn all() -> &'static [TaskType] {
        &[
            TaskType::TextReading,
            TaskType::ImageDescription,
            TaskType::PhotoCapture,
        ]
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text_reading" | "text" | "read" => Ok(TaskType::TextReading),
            "image_description" | "image" | "describe" => Ok(TaskType::ImageDescription),
            "photo_capture" | "photo" => Ok(TaskType::PhotoCapture),
            _ => Err(format!(
                "Unknown task type: {}. Available: text_reading, image_description, photo_capture",
                s
            )),
        }
    }
}

/// One completed task, as stored in the journal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    id: Uuid,
    task_type: TaskType,
    /// Passage that was read aloud (text reading only)
    #[serde(default)]
    text: Option<String>,
    /// Remote image that was described (image description only)
    #[serde(default)]
    image_url: Option<String>,
    /// Local photo file (photo capture only)
    #[serde(default)]
    image_path: Option<String>,
    /// Recorded audio artifact, absent when nothing was recorded
    #[serde(default)]
    audio_path: Option<String>,
    duration_sec: u32,
    timestamp: DateTime<Utc>,
}

impl Task {
    /// Create a text reading task from the passage and its accepted recording.
    pub fn text_reading(text: impl Into<String>, recording: Recording) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::blank(TaskType::TextReading, Some(recording))
        }
    }

    /// Create an image description task from the image URL and its accepted recording.
    pub fn image_description(image_url: impl Into<String>, recording: Recording) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..Self::blank(TaskType::ImageDescription, Some(recording))
        }
    }

    /// Create a photo capture task. The voice note is optional for photos.
    pub fn photo_capture(image_path: impl Into<String>, recording: Option<Recording>) -> Self {
        Self {
            image_path: Some(image_path.into()),
            ..Self::blank(TaskType::PhotoCapture, recording)
        }
    }

    fn blank(task_type: TaskType, recording: Option<Recording>) -> Self {
        let (audio_path, duration_sec) = match recording {
            Some(rec) if !rec.path.is_empty() => (Some(rec.path), rec.duration_sec),
            _ => (None, 0),
        };

        Self {
            id: Uuid::new_v4(),
            task_type,
            text: None,
            image_url: None,
            image_path: None,
            audio_path,
            duration_sec,
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn audio_path(&self) -> Option<&str> {
        self.audio_path.as_deref()
    }

    pub fn duration_sec(&self) -> u32 {
        self.duration_sec
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Check that only the content field belonging to this task's type is set.
    ///
    /// Always true for records built through the constructors; useful for
    /// records read back from a journal written by something else.
    pub fn is_consistent(&self) -> bool {
        let (text, url, path) = (
            self.text.is_some(),
            self.image_url.is_some(),
            self.image_path.is_some(),
        );
        match self.task_type {
            TaskType::TextReading => !url && !path,
            TaskType::ImageDescription => !text && !path,
            TaskType::PhotoCapture => !text && !url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(secs: u32) -> Recording {
        Recording {
            path: "/tmp/voicetask_audio_1.wav".to_string(),
            duration_sec: secs,
        }
    }

    #[test]
    fn test_text_reading_fills_only_text() {
        let task = Task::text_reading("Mega long lasting fragrance...", recording(12));
        assert_eq!(task.task_type(), TaskType::TextReading);
        assert_eq!(task.text(), Some("Mega long lasting fragrance..."));
        assert!(task.image_url().is_none());
        assert!(task.image_path().is_none());
        assert_eq!(task.audio_path(), Some("/tmp/voicetask_audio_1.wav"));
        assert_eq!(task.duration_sec(), 12);
        assert!(task.is_consistent());
    }

    #[test]
    fn test_photo_capture_without_recording() {
        let task = Task::photo_capture("/tmp/JPEG_1.jpg", None);
        assert_eq!(task.task_type(), TaskType::PhotoCapture);
        assert!(task.audio_path().is_none());
        assert_eq!(task.duration_sec(), 0);
        assert!(task.is_consistent());
    }

    #[test]
    fn test_empty_recording_path_is_treated_as_absent() {
        let task = Task::photo_capture(
            "/tmp/JPEG_1.jpg",
            Some(Recording {
                path: String::new(),
                duration_sec: 4,
            }),
        );
        assert!(task.audio_path().is_none());
        assert_eq!(task.duration_sec(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Task::image_description("https://example.com/a.jpg", recording(15));
        let b = Task::image_description("https://example.com/a.jpg", recording(15));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_serialized_field_names() {
        let task = Task::image_description("https://example.com/a.jpg", recording(15));
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["task_type"], "image_description");
        assert_eq!(value["image_url"], "https://example.com/a.jpg");
        assert_eq!(value["duration_sec"], 15);
        assert!(value["text"].is_null());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_inconsistent_record_is_detected() {
        let json = r#"{
            "id": "6f1c2a2e-8c55-4a59-9a3b-6d8f2f0c1a11",
            "task_type": "text_reading",
            "text": "hello",
            "image_url": "https://example.com/a.jpg",
            "duration_sec": 11,
            "timestamp": "2025-01-01T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.audio_path().is_none());
        assert!(!task.is_consistent());
    }

    #[test]
    fn test_task_type_from_str() {
        assert_eq!("photo".parse::<TaskType>().unwrap(), TaskType::PhotoCapture);
        assert_eq!(
            "IMAGE_DESCRIPTION".parse::<TaskType>().unwrap(),
            TaskType::ImageDescription
        );
        assert!("video".parse::<TaskType>().is_err());
    }
}
