//! The three recording tasks: text reading, image description, photo capture

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use voicetask_core::catalog::{
    DESCRIPTION_INSTRUCTION, READING_CHECKLIST, READING_INSTRUCTION, SAMPLE_IMAGE_URLS,
    SAMPLE_PASSAGE, sample_image,
};
use voicetask_core::{Task, TaskType, photo_path};

use crate::app::{AppContext, record_until_accepted};
use crate::ui;

/// Read the sample passage aloud, confirm the checklist, and submit.
pub async fn text_reading(ctx: &AppContext) -> Result<()> {
    ui::header("Text Reading Task");
    println!("{SAMPLE_PASSAGE}");
    println!();
    ui::info(READING_INSTRUCTION);

    let mut controller = ctx.controller_for(TaskType::TextReading);
    loop {
        let Some(recording) = record_until_accepted(&mut controller).await? else {
            ui::info("Task cancelled.");
            return Ok(());
        };

        let mut all_checked = true;
        for item in READING_CHECKLIST {
            if !ui::confirm(item, false)? {
                all_checked = false;
                break;
            }
        }

        let choice = if all_checked {
            ui::select("Next", &["Submit", "Record again", "Cancel"], Some(0))?
        } else {
            ui::error("All checks must be confirmed before submitting.");
            ui::select("Next", &["Record again", "Cancel"], Some(0))? + 1
        };

        match choice {
            0 => return submit(ctx, Task::text_reading(SAMPLE_PASSAGE, recording)).await,
            1 => continue,
            _ => {
                ui::info("Task cancelled.");
                return Ok(());
            }
        }
    }
}

/// Describe one of the sample images and submit.
pub async fn image_description(ctx: &AppContext, image: Option<usize>) -> Result<()> {
    ui::header("Image Description Task");

    let url = match image {
        Some(number) => sample_image(number).with_context(|| {
            format!(
                "No sample image {number}. Choose 1-{}.",
                SAMPLE_IMAGE_URLS.len()
            )
        })?,
        None => {
            let labels: Vec<String> = (1..=SAMPLE_IMAGE_URLS.len())
                .map(|n| format!("Image {n}"))
                .collect();
            SAMPLE_IMAGE_URLS[ui::select("Choose an image", &labels[..], Some(0))?]
        }
    };

    println!("Open this image: {url}");
    println!();
    ui::info(DESCRIPTION_INSTRUCTION);

    let mut controller = ctx.controller_for(TaskType::ImageDescription);
    let Some(recording) = record_until_accepted(&mut controller).await? else {
        ui::info("Task cancelled.");
        return Ok(());
    };

    if ui::confirm("Submit this description?", true)? {
        submit(ctx, Task::image_description(url, recording)).await
    } else {
        ui::info("Task cancelled.");
        Ok(())
    }
}

/// Store a photo in the data directory with an optional voice note.
pub async fn photo_capture(ctx: &AppContext, image_path: Option<PathBuf>) -> Result<()> {
    ui::header("Photo Capture Task");

    let source = match image_path {
        Some(path) => path,
        None => {
            let suggestion = newest_image(Path::new("."));
            let suggestion = suggestion.as_ref().map(|p| p.display().to_string());
            PathBuf::from(ui::input("Path to the photo", suggestion.as_deref())?)
        }
    };
    if !source.is_file() {
        bail!("Photo not found: {}", source.display());
    }

    let stored = store_photo(&source, &ctx.settings.photos_dir()).await?;
    ui::success(&format!("Photo saved: {}", stored.display()));

    let recording = if ui::confirm("Record a voice note for this photo?", true)? {
        let mut controller = ctx.controller_for(TaskType::PhotoCapture);
        record_until_accepted(&mut controller).await?
    } else {
        None
    };

    submit(
        ctx,
        Task::photo_capture(stored.display().to_string(), recording),
    )
    .await
}

/// Most recently modified JPEG or PNG directly inside `dir`
fn newest_image(dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png")
                })
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// Copy a photo into `dir` under a fresh capture name.
async fn store_photo(source: &Path, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let dest = photo_path(dir);
    tokio::fs::copy(source, &dest)
        .await
        .with_context(|| format!("Failed to copy photo to {}", dest.display()))?;
    Ok(dest)
}

async fn submit(ctx: &AppContext, task: Task) -> Result<()> {
    let task_type = task.task_type();
    ctx.journal
        .save_task(task)
        .await
        .context("Task was not saved")?;
    ui::success(&format!("{} task saved.", task_type.display_name()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_photo_copies_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("camera.jpg");
        std::fs::write(&source, b"jpeg bytes").unwrap();
        let photos = dir.path().join("photos");

        let stored = store_photo(&source, &photos).await.unwrap();

        assert_eq!(stored.parent(), Some(photos.as_path()));
        assert_eq!(std::fs::read(&stored).unwrap(), b"jpeg bytes");
        assert!(source.exists());
    }

    #[test]
    fn test_newest_image_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        std::fs::write(dir.path().join("IMG_0001.JPG"), b"jpeg bytes").unwrap();

        assert_eq!(
            newest_image(dir.path()),
            Some(dir.path().join("IMG_0001.JPG"))
        );
    }

    #[test]
    fn test_newest_image_none_without_photos() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        assert_eq!(newest_image(dir.path()), None);
        assert_eq!(newest_image(&dir.path().join("missing")), None);
    }
}
