//! File names for recorded audio and captured photos.

use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Path provider that namespaces files by the current time:
/// `<dir>/<prefix>_<unix millis>.<extension>`.
#[derive(Debug, Clone)]
pub struct TimestampedPath {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl TimestampedPath {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Path for a recording started now.
    pub fn next(&self) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.{}",
            self.prefix,
            Utc::now().timestamp_millis(),
            self.extension
        ))
    }

    /// Turn into a closure suitable for [`crate::PressHoldRecorder::new`].
    pub fn into_provider(self) -> impl Fn() -> PathBuf + Send + Sync + 'static {
        move || self.next()
    }
}

/// Destination for a captured photo: `<dir>/JPEG_<yyyyMMdd_HHmmss>_<id>.jpg`.
pub fn photo_path(dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let id = Uuid::new_v4().simple().to_string();
    dir.join(format!("JPEG_{}_{}.jpg", stamp, &id[..8]))
}
