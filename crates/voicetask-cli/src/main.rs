mod app;
mod args;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use voicetask_core::{Settings, init_tracing};

use app::AppContext;
use args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load();
    if let Some(dir) = cli.data_dir {
        settings.data_dir = Some(dir);
    }
    tracing::debug!(data_dir = %settings.data_dir().display(), "settings loaded");

    let ctx = AppContext::new(settings);
    match cli.command {
        None => commands::session::run(&ctx).await,
        Some(Command::Noise { simulate }) => commands::noise::run(&ctx, simulate).await.map(|_| ()),
        Some(Command::Read) => commands::tasks::text_reading(&ctx).await,
        Some(Command::Describe { image }) => commands::tasks::image_description(&ctx, image).await,
        Some(Command::Photo { image_path }) => {
            commands::tasks::photo_capture(&ctx, image_path).await
        }
        Some(Command::History { json }) => commands::history::run(&ctx, json).await,
        Some(Command::Config {
            show,
            set_data_dir,
            mic,
            list_mics,
        }) => commands::config::run(show, set_data_dir, mic, list_mics),
    }
}
