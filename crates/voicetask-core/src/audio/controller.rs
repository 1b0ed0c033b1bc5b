//! Press-and-hold recording session.
//!
//! The UI reports two events, press and release. [`PressHoldRecorder`] turns
//! them into exactly one start/stop cycle on the underlying recorder and
//! validates the captured duration before anything reaches the journal.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{AudioRecorder, Recording};

/// Produces a fresh target path for each recording.
pub type PathProvider = Box<dyn Fn() -> PathBuf + Send + Sync>;

/// Controller state. Transitions only via press start and press end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Accepted recording length, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingLimits {
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: u32,
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: u32,
}

fn default_min_duration() -> u32 {
    10
}

fn default_max_duration() -> u32 {
    20
}

impl Default for RecordingLimits {
    fn default() -> Self {
        Self {
            min_duration_secs: default_min_duration(),
            max_duration_secs: default_max_duration(),
        }
    }
}

impl RecordingLimits {
    /// Validate a finished recording against the limits.
    pub fn classify(&self, recording: Recording) -> RecordingOutcome {
        let duration_sec = recording.duration_sec;
        if duration_sec < self.min_duration_secs {
            RecordingOutcome::TooShort {
                duration_sec,
                min_duration_secs: self.min_duration_secs,
            }
        } else if duration_sec > self.max_duration_secs {
            RecordingOutcome::TooLong {
                duration_sec,
                max_duration_secs: self.max_duration_secs,
            }
        } else {
            RecordingOutcome::Accepted(recording)
        }
    }
}

/// What happened when the press began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Capture is running into `path`
    Started { path: PathBuf },
    /// A recording was already in progress; nothing was done
    AlreadyRecording,
    /// The recorder could not be acquired; the controller stayed idle
    Failed(String),
}

/// Validated result of one press cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingOutcome {
    Accepted(Recording),
    TooShort {
        duration_sec: u32,
        min_duration_secs: u32,
    },
    TooLong {
        duration_sec: u32,
        max_duration_secs: u32,
    },
    /// Releasing the recorder failed; the audio is lost
    Failed(String),
}

impl RecordingOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RecordingOutcome::Accepted(_))
    }

    /// The accepted recording, if any.
    pub fn accepted(self) -> Option<Recording> {
        match self {
            RecordingOutcome::Accepted(recording) => Some(recording),
            _ => None,
        }
    }

    /// User-facing rejection message (`None` when accepted).
    pub fn message(&self) -> Option<String> {
        match self {
            RecordingOutcome::Accepted(_) => None,
            RecordingOutcome::TooShort {
                min_duration_secs, ..
            } => Some(format!("Recording too short (min {min_duration_secs} s).")),
            RecordingOutcome::TooLong {
                max_duration_secs, ..
            } => Some(format!("Recording too long (max {max_duration_secs} s).")),
            RecordingOutcome::Failed(reason) => Some(format!("Recording failed: {reason}")),
        }
    }
}

/// Two-state controller driving an [`AudioRecorder`] from press/release events.
///
/// Holds no memory of earlier outcomes: to re-record, the caller discards
/// the accepted recording and runs another press cycle.
pub struct PressHoldRecorder {
    recorder: Arc<dyn AudioRecorder>,
    path_provider: PathProvider,
    limits: RecordingLimits,
    state: RecorderState,
}

impl PressHoldRecorder {
    pub fn new<F>(recorder: Arc<dyn AudioRecorder>, path_provider: F) -> Self
    where
        F: Fn() -> PathBuf + Send + Sync + 'static,
    {
        Self {
            recorder,
            path_provider: Box::new(path_provider),
            limits: RecordingLimits::default(),
            state: RecorderState::Idle,
        }
    }

    /// Use non-default duration limits.
    pub fn with_limits(mut self, limits: RecordingLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn limits(&self) -> RecordingLimits {
        self.limits
    }

    /// Press began: acquire the recorder and start capturing.
    ///
    /// Re-entrant presses are ignored without touching the recorder. If the
    /// recorder cannot be acquired the controller stays idle.
    pub async fn on_press_start(&mut self) -> StartOutcome {
        if self.state == RecorderState::Recording {
            debug!("press start ignored: already recording");
            return StartOutcome::AlreadyRecording;
        }

        let path = (self.path_provider)();
        match self.recorder.start_recording(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "recording started");
                self.state = RecorderState::Recording;
                StartOutcome::Started { path }
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to start recording");
                StartOutcome::Failed(err.to_string())
            }
        }
    }

    /// Press ended: stop capturing and validate the duration.
    ///
    /// Returns `None` when no recording was in progress.
    pub async fn on_press_end(&mut self) -> Option<RecordingOutcome> {
        if self.state != RecorderState::Recording {
            debug!("press end ignored: not recording");
            return None;
        }

        let stopped = self.recorder.stop_recording().await;
        self.state = RecorderState::Idle;

        let outcome = match stopped {
            Ok(recording) => self.limits.classify(recording),
            Err(err) => {
                warn!(error = %err, "failed to stop recording");
                RecordingOutcome::Failed(err.to_string())
            }
        };
        debug!(?outcome, "recording finished");
        Some(outcome)
    }

    /// Live input level for metering. Safe to call in any state.
    pub async fn level(&self) -> f32 {
        let level = self.recorder.get_amplitude().await;
        if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
