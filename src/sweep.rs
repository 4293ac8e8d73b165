//! sweep: report links and citations, then prune uncited bibliography entries
//!
//! Walks a directory for `.tex` and `.bib` files, checks every URL found in
//! them, compares declared BibTeX keys against `\cite` keys, and rewrites each
//! `.bib` file without the uncited entries.

use crate::bib::parse_keys;
use crate::check_links::{check_links, CheckLinksConfig};
use crate::extract::{extract_urls, CitationExtractor, CiteCommand};
use crate::prune::{prune_file, uncited, WriteMode};
use crate::report::{FileReport, Mode, SweepReport};
use crate::scan::discover;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Directory to scan recursively for .tex and .bib files
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Report only; leave .bib files untouched
    #[arg(long, env = "BIBSWEEP_DRY_RUN")]
    pub dry_run: bool,

    /// Write pruned .bib files under this directory instead of in place
    #[arg(long, value_name = "DIR", conflicts_with = "dry_run")]
    pub output_dir: Option<PathBuf>,

    /// Skip URL liveness checks
    #[arg(long, env = "BIBSWEEP_SKIP_LINKS")]
    pub skip_links: bool,

    /// Timeout per URL in milliseconds
    #[arg(long, default_value = "5000", env = "BIBSWEEP_TIMEOUT")]
    pub timeout: u64,

    /// Number of URLs checked in parallel (1-64)
    #[arg(short, long, default_value = "8", env = "BIBSWEEP_CONCURRENCY",
          value_parser = clap::value_parser!(u8).range(1..=64))]
    pub concurrency: u8,

    /// Citation command to look for (repeatable, without backslash)
    #[arg(long = "cite-command", value_name = "NAME", default_value = "cite")]
    pub cite_commands: Vec<String>,

    /// Print one compact JSON report instead of progress lines
    #[arg(long)]
    pub json: bool,
}

/// Resolved settings for a sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub input: PathBuf,
    pub mode: WriteMode,
    /// `None` skips link checking
    pub links: Option<CheckLinksConfig>,
    pub cite_commands: Vec<String>,
    /// Suppress the plain-text progress lines
    pub quiet: bool,
}

impl From<SweepArgs> for SweepConfig {
    fn from(args: SweepArgs) -> Self {
        let mode = if args.dry_run {
            WriteMode::DryRun
        } else if let Some(out) = args.output_dir {
            WriteMode::OutputDir {
                root: args.input.clone(),
                out,
            }
        } else {
            WriteMode::InPlace
        };

        let links = (!args.skip_links).then(|| CheckLinksConfig {
            concurrency: args.concurrency as usize,
            timeout_ms: args.timeout,
        });

        Self {
            input: args.input,
            mode,
            links,
            cite_commands: args.cite_commands,
            quiet: args.json,
        }
    }
}

/// Run the sweep command
pub async fn run_sweep(args: SweepArgs) -> Result<()> {
    let json = args.json;
    let report = sweep(&SweepConfig::from(args)).await?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}

/// Scan, check, and prune. Progress lines go to stdout unless `quiet`.
pub async fn sweep(config: &SweepConfig) -> Result<SweepReport> {
    let say = |line: String| {
        if !config.quiet {
            println!("{}", line);
        }
    };

    let files = discover(&config.input)?;
    say(format!("Found {} tex files", files.tex.len()));
    say(format!("Found {} bib files", files.bib.len()));

    let mut urls = BTreeSet::new();
    for file in files.all() {
        let content = read(file).await?;
        urls.extend(extract_urls(&content));
    }
    say(format!("Found {} urls in tex files", urls.len()));

    let links = match &config.links {
        Some(link_config) => {
            say("Testing urls in tex files...".to_string());
            let urls: Vec<String> = urls.iter().cloned().collect();
            let link_report = check_links(&urls, link_config).await?;
            for url in link_report.broken_urls() {
                say(format!("URL {} is broken", url));
            }
            Some(link_report.results)
        }
        None => {
            tracing::info!("link checking skipped");
            None
        }
    };

    let mut declared = BTreeSet::new();
    for file in &files.bib {
        let content = read(file).await?;
        declared.extend(parse_keys(&content));
    }

    let extractor = CiteCommand::with_commands(config.cite_commands.as_slice());
    let mut cited = BTreeSet::new();
    for file in &files.tex {
        let content = read(file).await?;
        cited.extend(extractor.extract(&content));
    }

    let unused = uncited(&declared, &cited);

    let mut report = SweepReport {
        timestamp: String::new(),
        tex_files: files.tex.len(),
        bib_files: files.bib.len(),
        urls: urls.len(),
        links,
        references: declared.len(),
        citations: cited.len(),
        uncited: unused.iter().cloned().collect(),
        files: Vec::with_capacity(files.bib.len()),
        mode: mode_of(&config.mode),
    };
    if !config.quiet {
        print!("{}", report.citation_summary());
    }

    for file in &files.bib {
        let outcome = prune_file(file, &unused, &config.mode).await?;
        report.files.push(FileReport {
            source: outcome.source.display().to_string(),
            written_to: outcome.written_to.map(|p| p.display().to_string()),
            kept: outcome.kept,
            removed: outcome.removed,
        });
    }

    report.timestamp = Utc::now().to_rfc3339();
    say("Done".to_string());

    Ok(report)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn mode_of(mode: &WriteMode) -> Mode {
    match mode {
        WriteMode::InPlace => Mode::InPlace,
        WriteMode::DryRun => Mode::DryRun,
        WriteMode::OutputDir { .. } => Mode::OutputDir,
    }
}
