//! bibsweep CLI
//!
//! Scans a LaTeX project, reports broken links and uncited references, and
//! rewrites .bib files without the uncited entries.

use anyhow::{Context, Result};
use bibsweep::sweep::{run_sweep, SweepArgs};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bibsweep")]
#[command(version)]
#[command(about = "Prune uncited BibTeX entries and report broken links")]
#[command(long_about = "Prune uncited BibTeX entries and report broken links.\n\nWARNING: without --dry-run or --output-dir, .bib files are rewritten in place\nand uncited entries are removed permanently.")]
struct Cli {
    #[command(flatten)]
    sweep: SweepArgs,

    /// Write tracing/debug logs to this file (default: stderr)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;
    run_sweep(cli.sweep).await
}

/// File (no ANSI) if a log path is given, otherwise stderr. Level via RUST_LOG.
fn init_tracing(log: Option<&std::path::Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
