//! CLI entrypoint for moa
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod app;

use anyhow::{Result, anyhow};
use app::App;
use clap::Parser;
use moa_infrastructure::{ConfigLoader, FileConfig};
use moa_presentation::{Cli, Command};
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.file.as_deref())?;

    info!("Starting moa");
    for warning in config.validate() {
        warn!("{}", warning);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    if let Command::Config = cli.command {
        print_config(&config);
        return Ok(());
    }

    let format = cli
        .output
        .map(Into::into)
        .or_else(|| config.output.format())
        .unwrap_or_default();

    let app = App::new(&config, format, cli.quiet);
    app.dispatch(cli.command).await
}

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr, or to `[logging] file` through a non-blocking writer.
fn init_tracing(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
    if let Some(directory) = directory {
        std::fs::create_dir_all(directory)?;
    }

    let appender =
        tracing_appender::rolling::never(directory.unwrap_or_else(|| Path::new(".")), file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

fn print_config(config: &FileConfig) {
    for line in ConfigLoader::config_sources() {
        println!("{}", line);
    }

    println!();
    println!(
        "Scenarios directory: {}",
        config.scenarios.resolved_directory().display()
    );

    let providers: Vec<&str> = config
        .providers
        .iter()
        .filter(|(_, p)| p.command.is_some())
        .map(|(id, _)| id.as_str())
        .collect();
    if providers.is_empty() {
        println!("Providers with a command: (none)");
    } else {
        println!("Providers with a command: {}", providers.join(", "));
    }

    if let Some(transcript) = &config.logging.transcript {
        println!("Run transcript: {}", transcript.display());
    }

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in warnings {
            println!("  * {}", warning);
        }
    }
}
