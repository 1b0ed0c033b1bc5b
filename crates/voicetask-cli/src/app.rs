use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use voicetask_core::{
    AudioRecorder, FileStorage, MicrophoneRecorder, PressHoldRecorder, Recording,
    RecordingOutcome, Settings, StartOutcome, TaskJournal, TaskType, TimestampedPath,
};

use crate::ui;

/// How often the level meter is redrawn while recording
const METER_INTERVAL: Duration = Duration::from_millis(150);

/// Everything a command needs: settings, the journal, and the microphone.
pub struct AppContext {
    pub settings: Settings,
    pub journal: TaskJournal<FileStorage>,
    pub recorder: Arc<dyn AudioRecorder>,
}

impl AppContext {
    pub fn new(settings: Settings) -> Self {
        let journal = TaskJournal::new(FileStorage::new(settings.data_dir()));
        let recorder: Arc<dyn AudioRecorder> =
            Arc::new(MicrophoneRecorder::new(settings.microphone_device.clone()));
        Self {
            settings,
            journal,
            recorder,
        }
    }

    /// Press/hold controller writing into the audio dir with the task's prefix
    pub fn controller_for(&self, task_type: TaskType) -> PressHoldRecorder {
        let paths = TimestampedPath::new(self.settings.audio_dir(), task_type.audio_prefix(), "wav");
        PressHoldRecorder::new(Arc::clone(&self.recorder), paths.into_provider())
            .with_limits(self.settings.recording)
    }

    /// Scratch file for captures that are thrown away (noise check)
    pub fn scratch_path(&self) -> PathBuf {
        std::env::temp_dir().join("voicetask_noise_check.wav")
    }
}

/// Block until Enter is pressed.
pub fn wait_for_enter() -> Result<()> {
    std::io::stdout().flush()?;

    // Enable raw mode to read keypresses without echoing
    enable_raw_mode()?;

    let result = loop {
        match event::read() {
            Ok(Event::Key(key_event))
                if key_event.code == KeyCode::Enter && key_event.kind == KeyEventKind::Press =>
            {
                break Ok(());
            }
            Ok(_) => {}
            Err(e) => break Err(e),
        }
    };

    // Restore normal mode
    disable_raw_mode()?;

    Ok(result?)
}

/// Wait for Enter without blocking the runtime.
pub async fn wait_for_enter_async() -> Result<()> {
    tokio::task::spawn_blocking(wait_for_enter)
        .await
        .context("Keyboard listener stopped unexpectedly")?
}

/// Run press cycles until one is accepted or the user gives up.
///
/// Enter starts the recording (the press) and Enter again stops it (the
/// release). While recording, the input level is drawn as a live meter.
pub async fn record_until_accepted(controller: &mut PressHoldRecorder) -> Result<Option<Recording>> {
    let limits = controller.limits();

    loop {
        ui::info(&format!(
            "Press Enter to start recording ({}-{} s).",
            limits.min_duration_secs, limits.max_duration_secs
        ));
        wait_for_enter_async().await?;

        match controller.on_press_start().await {
            StartOutcome::Started { .. } => {}
            StartOutcome::AlreadyRecording => continue,
            StartOutcome::Failed(reason) => {
                ui::error(&format!("Could not start recording: {reason}"));
                if ui::confirm("Try again?", true)? {
                    continue;
                }
                return Ok(None);
            }
        }

        let stop = tokio::task::spawn_blocking(wait_for_enter);
        tokio::pin!(stop);
        let started = std::time::Instant::now();

        loop {
            tokio::select! {
                released = &mut stop => {
                    let released = released
                        .context("Keyboard listener stopped unexpectedly")
                        .and_then(|r| r);
                    stop_on_listener_error(controller, released).await?;
                    break;
                }
                _ = tokio::time::sleep(METER_INTERVAL) => {
                    let level = controller.level().await;
                    print!(
                        "\r  Recording... {} {:>3}s  (Enter to stop) ",
                        ui::level_bar(level, 20),
                        started.elapsed().as_secs()
                    );
                    std::io::stdout().flush().ok();
                }
            }
        }
        println!();

        match controller.on_press_end().await {
            Some(RecordingOutcome::Accepted(recording)) => {
                ui::success(&format!(
                    "Recorded: {} ({}s)",
                    recording.path, recording.duration_sec
                ));
                return Ok(Some(recording));
            }
            Some(rejected) => {
                if let Some(message) = rejected.message() {
                    ui::error(&message);
                }
            }
            None => {}
        }

        if !ui::confirm("Record again?", true)? {
            return Ok(None);
        }
    }
}

/// Pass a failed Enter listener's error up, stopping the capture first so
/// the shared recorder is free for the next task.
async fn stop_on_listener_error(
    controller: &mut PressHoldRecorder,
    released: Result<()>,
) -> Result<()> {
    if let Err(e) = released {
        if controller.is_recording() {
            warn!(error = %e, "keyboard listener failed while recording; stopping capture");
            controller.on_press_end().await;
        }
        return Err(e);
    }
    Ok(())
}
