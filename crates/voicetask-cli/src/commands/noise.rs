//! Ambient noise test

use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tracing::warn;
use voicetask_core::{
    AudioRecorder, LevelNoiseMeter, NoiseCheck, NoiseMeter, NoiseVerdict, SimulatedNoiseMeter,
};

use crate::app::AppContext;
use crate::ui;

/// Where one check takes its readings from
#[derive(Debug, PartialEq, Eq)]
enum Source {
    Simulated,
    Microphone,
}

/// Run the noise check once and report the verdict.
///
/// Without `simulate` the microphone is used; when it cannot be started the
/// check falls back to simulated readings.
pub async fn run(ctx: &AppContext, simulate: bool) -> Result<NoiseVerdict> {
    ui::header("Noise Test");

    let check = NoiseCheck::new(ctx.settings.noise);
    // Capture into a scratch file so the recorder reports live levels
    let scratch = ctx.scratch_path();
    let verdict = match acquire(ctx.recorder.as_ref(), &scratch, simulate).await {
        Source::Simulated => measure(&check, &SimulatedNoiseMeter).await,
        Source::Microphone => {
            let verdict = measure(&check, &LevelNoiseMeter::new(ctx.recorder.clone())).await;
            release(ctx.recorder.as_ref(), &scratch).await?;
            verdict
        }
    };
    println!();

    match verdict {
        NoiseVerdict::Pass { average_db } => {
            ui::success(&format!("{} (average {average_db} dB)", verdict.message()));
        }
        NoiseVerdict::TooNoisy { average_db } => {
            ui::error(&format!("{} (average {average_db} dB)", verdict.message()));
        }
    }
    Ok(verdict)
}

/// Repeat the check until it passes or the user stops trying.
pub async fn run_until_pass(ctx: &AppContext, simulate: bool) -> Result<bool> {
    loop {
        if run(ctx, simulate).await?.passed() {
            return Ok(true);
        }
        if !ui::confirm("Test again?", true)? {
            return Ok(false);
        }
    }
}

async fn acquire(recorder: &dyn AudioRecorder, scratch: &Path, simulate: bool) -> Source {
    if simulate {
        return Source::Simulated;
    }
    match recorder.start_recording(scratch).await {
        Ok(()) => Source::Microphone,
        Err(e) => {
            warn!(error = %e, "microphone unavailable for noise check; using simulated readings");
            ui::info("No microphone available, using simulated readings.");
            Source::Simulated
        }
    }
}

/// Stop the scratch capture and delete its file, even when stopping fails.
async fn release(recorder: &dyn AudioRecorder, scratch: &Path) -> Result<()> {
    let stopped = recorder.stop_recording().await;
    let _ = tokio::fs::remove_file(scratch).await;
    stopped?;
    Ok(())
}

async fn measure<M: NoiseMeter>(check: &NoiseCheck, meter: &M) -> NoiseVerdict {
    check
        .run(meter, |db| {
            print!("\r  {} {db:>2} dB ", ui::level_bar(db as f32 / 60.0, 30));
            std::io::stdout().flush().ok();
        })
        .await
}
