//! Main entry point for the zipcrack CLI application.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zipcrack::{Cli, CrackError, SearchOutcome, crack};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.log_level());

    let config = cli.search_config();
    info!(
        archive = %cli.file.display(),
        alphabet = ?config.alphabet,
        suffix_len = config.suffix_len,
        workers = config.workers,
        "starting search"
    );

    let report = match crack(&cli.file, cli.entry.as_deref(), config).await {
        Ok(report) => report,
        Err(e) => {
            // Still hand over a recovered password that could not be saved
            if let CrackError::Output { password, .. } = &e {
                println!("{password}");
            }
            return Err(e.into());
        }
    };

    match report.outcome {
        SearchOutcome::Found(password) => {
            println!("{password}");
            info!(
                "{} attempts, {} false positives, password saved to {}",
                report.attempts,
                report.false_positives,
                cli.output.display()
            );
        }
        // Already reported by the search
        SearchOutcome::Exhausted => std::process::exit(1),
    }

    Ok(())
}

fn setup_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
