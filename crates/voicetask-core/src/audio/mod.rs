//! Audio capture: the recorder capability and the press-and-hold controller.
//!
//! ## Modules
//!
//! - `controller` - Two-state press/hold session with duration validation
//! - `level` - Peak amplitude to normalized meter level
//! - `microphone` - cpal/hound backed recorder (feature `microphone`)

mod controller;
mod level;
#[cfg(feature = "microphone")]
mod microphone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use controller::{
    PathProvider, PressHoldRecorder, RecorderState, RecordingLimits, RecordingOutcome,
    StartOutcome,
};
pub use level::normalize_level;
#[cfg(feature = "microphone")]
pub use microphone::{MicrophoneRecorder, list_input_devices};

/// Result of one complete record-then-stop cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Where the audio artifact was written (empty when nothing was captured)
    pub path: String,
    /// Whole seconds between start and stop
    pub duration_sec: u32,
}

impl Recording {
    /// The outcome of stopping when no recording was active.
    pub fn empty() -> Self {
        Self {
            path: String::new(),
            duration_sec: 0,
        }
    }
}

/// Failure to acquire or release the recording resource.
#[derive(Debug, Error)]
pub enum RecorderFault {
    #[error("audio input unavailable: {0}")]
    Unavailable(String),

    #[error("a recording is already in progress")]
    AlreadyActive,

    #[error("recorder I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write audio file: {0}")]
    Encode(String),
}

/// Platform audio recorder.
///
/// Implementations hold a single exclusive capture handle. All methods take
/// `&self` so one recorder can be shared between the press/hold controller
/// and level metering.
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Begin capturing to `target_path`.
    async fn start_recording(&self, target_path: &Path) -> Result<(), RecorderFault>;

    /// End capture and release the handle.
    ///
    /// Returns [`Recording::empty`] when nothing is being recorded.
    async fn stop_recording(&self) -> Result<Recording, RecorderFault>;

    /// Current input level in `[0, 1]`; `0` when idle or unreadable.
    async fn get_amplitude(&self) -> f32;
}
