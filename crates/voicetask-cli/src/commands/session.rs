//! Guided session: intro, noise test, then the task menu

use anyhow::Result;
use voicetask_core::{TaskType, is_verbose};

use super::{history, noise, tasks};
use crate::app::{AppContext, wait_for_enter_async};
use crate::ui;

/// Menu entries after the task types
const EXTRA_ENTRIES: &[&str] = &["Task History", "Quit"];

fn menu() -> Vec<String> {
    TaskType::all()
        .iter()
        .map(|t| format!("{} Task", t.display_name()))
        .chain(EXTRA_ENTRIES.iter().map(|e| e.to_string()))
        .collect()
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    ui::header("Let's start with a Sample Task for practice.");
    println!("Pehele hum ek sample task karte hain.");
    println!();
    ui::info("Press Enter to start the sample task.");
    wait_for_enter_async().await?;

    if !noise::run_until_pass(ctx, false).await? {
        ui::info("Come back when you have found a quieter place.");
        return Ok(());
    }

    let entries = menu();
    loop {
        ui::header("Select a Task");
        let choice = ui::select("Task", &entries[..], Some(0))?;
        let outcome = match TaskType::all().get(choice) {
            Some(TaskType::TextReading) => tasks::text_reading(ctx).await,
            Some(TaskType::ImageDescription) => tasks::image_description(ctx, None).await,
            Some(TaskType::PhotoCapture) => tasks::photo_capture(ctx, None).await,
            None if choice == TaskType::all().len() => history::run(ctx, false).await,
            None => return Ok(()),
        };

        // A failed task returns to the menu instead of ending the session
        if let Err(e) = outcome {
            if is_verbose() {
                ui::error(&format!("{e:?}"));
            } else {
                ui::error(&format!("{e:#}"));
            }
        }
    }
}
