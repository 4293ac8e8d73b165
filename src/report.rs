//! Sweep report
//!
//! Printed either as the plain progress lines or as one compact JSON object.

use crate::check_links::LinkResult;
use serde::Serialize;

/// Root structure for `--json` output
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// RFC 3339 time the sweep finished
    pub timestamp: String,
    pub tex_files: usize,
    pub bib_files: usize,
    /// Distinct URLs found in tex and bib files
    pub urls: usize,
    /// Present only when links were checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkResult>>,
    /// Distinct keys declared across all bib files
    pub references: usize,
    /// Distinct keys cited across all tex files
    pub citations: usize,
    pub uncited: Vec<String>,
    pub files: Vec<FileReport>,
    pub mode: Mode,
}

/// Per-bib-file rewrite summary
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
    pub kept: usize,
    pub removed: usize,
}

/// How bib files were handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    InPlace,
    DryRun,
    OutputDir,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::InPlace => write!(f, "in_place"),
            Mode::DryRun => write!(f, "dry_run"),
            Mode::OutputDir => write!(f, "output_dir"),
        }
    }
}

impl SweepReport {
    /// URLs classified as broken
    pub fn broken_urls(&self) -> impl Iterator<Item = &str> {
        self.links
            .iter()
            .flatten()
            .filter(|l| l.broken)
            .map(|l| l.url.as_str())
    }

    /// Summary lines shown after the URL report
    pub fn citation_summary(&self) -> String {
        let mut lines = vec![
            format!("Found {} references in bib files", self.references),
            format!("Found {} citations in tex files", self.citations),
            format!("Found {} uncited references", self.uncited.len()),
        ];
        if !self.uncited.is_empty() {
            lines.push(format_key_set(&self.uncited));
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `{'a', 'b'}` style listing of keys
pub fn format_key_set(keys: &[String]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| format!("'{}'", k)).collect();
    format!("{{{}}}", quoted.join(", "))
}
