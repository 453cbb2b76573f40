use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use fishysearch::AppConfig;
use fishysearch::cli::{Cli, Commands, commands};
use fishysearch::config::LoggingConfig;
use fishysearch::coordinator::SystemClock;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.settings.as_deref()).context("failed to load settings")?;
    if let Some(path) = cli.config {
        config.paths.config_path = path;
    }
    if let Some(dir) = cli.results_dir {
        config.paths.results_dir = dir;
    }

    // Keep the guard alive so buffered file output is flushed on exit
    let _guard = init_tracing(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!("Starting FishySearch aggregation...");
            let summary = commands::run_aggregation(&config, Arc::new(SystemClock)).await?;
            println!("{}", summary);
            if summary.is_failure() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Check => commands::check_config(&config)?,
        Commands::Summary { date } => commands::show_summary(&config, date)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .context("invalid log filter")?;

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "fishysearch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}
