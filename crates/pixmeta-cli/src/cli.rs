// crates/pixmeta-cli/src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pixmeta - image header inspector and compression estimator
#[derive(Parser)]
#[command(name = "pixmeta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Print one JSON document instead of the table
    #[arg(long, global = true)]
    pub json: bool,

    /// Files inspected per chunk before yielding
    #[arg(long, global = true)]
    pub chunk_size: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect every file matching one or more patterns
    Scan {
        /// File patterns (e.g., ~/photos/*.jpg, ./scans/**/*.tif)
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Inspect a single file in detail
    Inspect {
        /// Input file path
        file: PathBuf,

        /// MIME type used when the extension is missing or unknown
        #[arg(long)]
        mime: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Reset to defaults
    Reset,

    /// Show config file path
    Path,
}
