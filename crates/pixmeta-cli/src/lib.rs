pub mod cli;
pub mod config;
pub mod output;
pub mod paths;
pub mod progress;
pub mod report;
pub mod scan;

pub use cli::{Cli, Commands, ConfigCommands};
pub use config::Config;
pub use output::OutputFormatter;
pub use paths::PathResolver;
pub use progress::ProgressReporter;
pub use report::{OutcomeRecord, ScanReport};
pub use scan::{drive_batch, BatchRun};
