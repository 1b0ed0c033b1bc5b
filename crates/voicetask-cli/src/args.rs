use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "voicetask")]
#[command(version)]
#[command(about = "Guided voice tasks: read, describe, capture, and keep a history")]
#[command(after_help = "Run without a subcommand for the guided session.")]
pub struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this directory for the journal, recordings and photos
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that the room is quiet enough to record
    Noise {
        /// Use simulated readings instead of the microphone
        #[arg(long)]
        simulate: bool,
    },

    /// Read the sample passage aloud
    Read,

    /// Describe a sample image
    Describe {
        /// Sample image number (1-6); prompts when omitted
        #[arg(long, value_name = "N")]
        image: Option<usize>,
    },

    /// Attach a voice note to a photo
    Photo {
        /// Photo to submit; prompts when omitted
        #[arg(long, value_name = "FILE")]
        image_path: Option<PathBuf>,
    },

    /// Show completed tasks, newest first
    History {
        /// Print the journal as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        /// Print the current settings
        #[arg(long)]
        show: bool,

        /// Store the data directory permanently
        #[arg(long = "set-data-dir", value_name = "DIR")]
        set_data_dir: Option<PathBuf>,

        /// Microphone device name ("default" for the system default)
        #[arg(long, value_name = "NAME")]
        mic: Option<String>,

        /// List available microphones
        #[arg(long)]
        list_mics: bool,
    },
}
