mod cli;
mod commands;
mod config;
mod error;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);

    let report = commands::run(&cli.command, &settings).await?;
    output::render(&report.envelope, &report.tables, cli.format, cli.pretty)?;

    let warning_count = report.envelope.meta.warnings.len();
    if settings.strict && warning_count > 0 {
        return Err(CliError::StrictModeViolation { warning_count });
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so stdout only carries command output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feescout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
