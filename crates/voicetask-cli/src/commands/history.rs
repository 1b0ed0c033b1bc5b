//! Task history listing

use anyhow::Result;
use voicetask_core::{JournalSummary, Task};

use crate::app::AppContext;
use crate::ui;

pub async fn run(ctx: &AppContext, json: bool) -> Result<()> {
    let tasks = ctx.journal.load_all().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    let summary = JournalSummary::from_tasks(&tasks);
    ui::header("Task History");
    println!(
        "Total Tasks: {}    Total Duration: {}s",
        summary.total_tasks, summary.total_duration_sec
    );
    println!();

    if tasks.is_empty() {
        ui::info("No tasks yet. Complete a task to see it here.");
        return Ok(());
    }

    for task in &tasks {
        println!("{}", format_task(task));
    }

    let inconsistent = tasks.iter().filter(|t| !t.is_consistent()).count();
    if inconsistent > 0 {
        tracing::warn!(inconsistent, "journal holds records with fields of another task type");
        ui::error(&format!(
            "{inconsistent} record(s) carry content that does not match their task type."
        ));
    }
    Ok(())
}

/// One history line: short id, type, duration, time, and a content preview
fn format_task(task: &Task) -> String {
    let id = task.id().simple().to_string();
    let mut line = format!(
        "{}  {:<17}  {:>3}s  {}",
        &id[..8],
        task.task_type().display_name(),
        task.duration_sec(),
        task.timestamp().format("%Y-%m-%d %H:%M:%S")
    );

    let preview = task
        .text()
        .map(|text| text.chars().take(30).collect::<String>())
        .or_else(|| task.image_path().map(str::to_string))
        .or_else(|| task.image_url().map(str::to_string));
    if let Some(preview) = preview {
        line.push_str("  ");
        line.push_str(&preview);
    }
    if !task.is_consistent() {
        line.push_str("  [inconsistent record]");
    }
    line
}
