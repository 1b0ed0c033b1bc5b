//! Settings management

use anyhow::Result;
use std::path::PathBuf;
use voicetask_core::{Settings, list_input_devices};

use crate::ui;

pub fn run(
    show: bool,
    set_data_dir: Option<PathBuf>,
    mic: Option<String>,
    list_mics: bool,
) -> Result<()> {
    if list_mics {
        let devices = list_input_devices()?;
        if devices.is_empty() {
            ui::info("No input devices found.");
        }
        for device in devices {
            println!("  {device}");
        }
        return Ok(());
    }

    let mut settings = Settings::load();
    let mut changed = false;

    if let Some(dir) = set_data_dir {
        settings.data_dir = Some(dir);
        changed = true;
    }

    if let Some(name) = mic {
        settings.microphone_device = match name.as_str() {
            "default" | "" => None,
            _ => Some(name),
        };
        changed = true;
    }

    if changed {
        settings.save()?;
        ui::success(&format!("Settings saved to {}", Settings::path().display()));
    }

    if show || !changed {
        println!("Settings file: {}", Settings::path().display());
        println!("Data directory: {}", settings.data_dir().display());
        println!(
            "Microphone: {}",
            settings
                .microphone_device
                .as_deref()
                .unwrap_or("system default")
        );
        println!(
            "Recording length: {}-{} s",
            settings.recording.min_duration_secs, settings.recording.max_duration_secs
        );
        println!(
            "Noise check: {} samples every {} ms, average below {} dB",
            settings.noise.samples, settings.noise.interval_ms, settings.noise.max_average_db
        );
    }

    Ok(())
}
