use anyhow::{Context, Result};
use clap::Parser;
use pixmeta_cli::{
    drive_batch, BatchRun, Cli, Commands, Config, ConfigCommands, OutcomeRecord,
    OutputFormatter, PathResolver, ProgressReporter, ScanReport,
};
use pixmeta_core::{BatchEvent, BatchScheduler, FileInput, Inspector, OutcomeStatus};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        "pixmeta=debug"
    } else {
        "pixmeta=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .without_time()
        .init();

    // Load config
    let mut config = Config::load()?;

    // Override config with CLI flags
    if cli.no_color {
        config.colored_output = false;
    }
    if cli.no_progress {
        config.show_progress = false;
    }
    if cli.json {
        config.json_output = true;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if config.json_output {
        // keep the terminal free of bars while a document is being produced
        config.show_progress = false;
    }

    let formatter = OutputFormatter::new(config.colored_output);
    let progress = ProgressReporter::new(config.show_progress);

    match cli.command {
        Commands::Scan { patterns } => {
            handle_scan(patterns, &config, &formatter, &progress).await?;
        }

        Commands::Inspect { file, mime } => {
            handle_inspect(file, mime, &config, &formatter, &progress).await?;
        }

        Commands::Config { action } => {
            handle_config(action, &formatter)?;
        }
    }

    Ok(())
}

async fn handle_scan(
    patterns: Vec<String>,
    config: &Config,
    formatter: &OutputFormatter,
    progress: &ProgressReporter,
) -> Result<()> {
    let resolver = PathResolver::new()?;
    let paths = resolver.resolve_patterns(&patterns)?;

    if paths.is_empty() {
        anyhow::bail!("No files matched: {}", patterns.join(" "));
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        match FileInput::from_path(path) {
            Ok(input) => files.push(input),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                formatter.error(&format!("Could not read {}: {}", path.display(), e));
            }
        }
    }

    if !config.json_output {
        formatter.info(&format!("Found {} files to inspect", files.len()));
    }

    let scheduler = BatchScheduler::new(Arc::new(Inspector::new()), config.batch_options());
    let pb = progress.create_bar(files.len() as u64, "Inspecting...");

    let run = drive_batch(&scheduler, files, tokio::signal::ctrl_c(), |event| match event {
        BatchEvent::Outcome { outcome, .. } if !config.json_output => {
            ProgressReporter::suspend(&pb, || formatter.print_outcome(outcome));
        }
        BatchEvent::Progress(p) => ProgressReporter::set_position(&pb, p.completed as u64),
        _ => {}
    })
    .await;
    let BatchRun {
        outcomes,
        progress: last,
        cancelled,
    } = run;

    if cancelled {
        ProgressReporter::finish_bar_error(&pb, "Cancelled");
    } else {
        ProgressReporter::finish_bar(&pb, "Batch complete");
    }

    if config.json_output {
        let report = ScanReport::new(&outcomes, &last, cancelled);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if cancelled {
        formatter.warn(&format!(
            "Cancelled after {}/{} files",
            last.completed, last.total
        ));
    }

    let inspected = outcomes.iter().filter(|o| o.is_success()).count();
    formatter.print_batch_summary(last.total, inspected, last.failed.len(), last.duplicates);

    Ok(())
}

async fn handle_inspect(
    file: PathBuf,
    mime: Option<String>,
    config: &Config,
    formatter: &OutputFormatter,
    progress: &ProgressReporter,
) -> Result<()> {
    let mut input = FileInput::from_path(&file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    if let Some(mime) = mime {
        input = input.with_mime(mime);
    }

    let spinner = progress.create_spinner("Inspecting...");
    let outcome = Inspector::new().inspect(&input).await;

    if outcome.is_success() {
        ProgressReporter::finish_bar(&spinner, "Done");
    } else {
        ProgressReporter::finish_bar_error(&spinner, "Failed");
    }

    if config.json_output {
        let record = OutcomeRecord::from(&outcome);
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    match &outcome.status {
        OutcomeStatus::Inspected(inspection) => formatter.print_inspection(&outcome.key, inspection),
        OutcomeStatus::Failed(e) => anyhow::bail!("{}: {}", outcome.key.name, e),
        OutcomeStatus::Duplicate => {}
    }

    Ok(())
}

fn handle_config(action: ConfigCommands, formatter: &OutputFormatter) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let config = Config::load()?;
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }

        ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            formatter.success(&format!("Set {} = {}", key, value));
        }

        ConfigCommands::Reset => {
            Config::reset()?;
            formatter.success("Configuration reset to defaults");
        }

        ConfigCommands::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
