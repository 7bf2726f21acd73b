//! Salient CLI: run the salience tracker outside a renderer.
//!
//! Usage:
//!   salient simulate [OPTIONS]     Track a synthetic moving-patch scene
//!   salient replay <DIR>           Track a directory of still images
//!   salient profile [NAME]         Print a built-in detector profile
//!   salient validate <FILE>        Validate a detector profile file
//!
//! Tracking commands print one JSON object per tick on stdout. Logs go to
//! stderr.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;
mod driver;
mod scene;

#[derive(Parser)]
#[command(
    name = "salient",
    about = "Real-time salient region tracking for a single video source",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every tracking command.
#[derive(Args, Debug, Clone)]
pub struct TrackArgs {
    /// Built-in detector profile (default, legacy, focus)
    #[arg(short, long)]
    profile: Option<String>,

    /// Detector profile JSON file; overrides --profile
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dump the analysis grid to stderr after every frame
    #[arg(long)]
    debug_grid: bool,

    /// Pace frames at the configured tick rate instead of running flat out
    #[arg(long)]
    realtime: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a synthetic scene with a moving bright patch
    Simulate {
        /// Number of frames to generate
        #[arg(short, long, default_value = "300")]
        frames: u64,

        /// Frame width in pixels
        #[arg(long, default_value = "640")]
        width: u32,

        /// Frame height in pixels
        #[arg(long, default_value = "480")]
        height: u32,

        #[command(flatten)]
        track: TrackArgs,
    },

    /// Track a directory of still images, in file-name order
    Replay {
        /// Directory containing PNG/JPEG/BMP frames
        dir: PathBuf,

        #[command(flatten)]
        track: TrackArgs,
    },

    /// Print a built-in detector profile as JSON
    Profile {
        /// Profile name; lists the available profiles when omitted
        name: Option<String>,
    },

    /// Validate a detector profile file
    Validate {
        /// Path to the profile JSON
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = salient_common::AppConfig::load();

    let mut logging = app.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    salient_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Simulate {
            frames,
            width,
            height,
            track,
        } => commands::simulate::run(frames, width, height, track, &app).await,
        Commands::Replay { dir, track } => commands::replay::run(dir, track, &app).await,
        Commands::Profile { name } => commands::profile::run(name),
        Commands::Validate { path } => commands::validate::run(path),
    }
}
