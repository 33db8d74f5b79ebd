use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidport")]
#[command(author, version, about = "Upload videos and play them back over adaptive HLS")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a video file with its metadata
    Upload {
        /// Video file to upload
        #[arg(required = true)]
        file: PathBuf,

        /// Video title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Video description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List videos stored on the service
    List,

    /// Print the adaptive-streaming manifest URL for a video
    Url {
        /// Stored video identifier
        video_id: String,
    },

    /// Load a video's manifest through the playback selector
    Play {
        /// Stored video identifier
        video_id: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
