//! bibsweep: bibliography hygiene for LaTeX projects
//!
//! - bib: brace-counting BibTeX entry tokenizer
//! - extract: URL and `\cite` key extraction
//! - check_links: URL liveness checks
//! - prune: drop uncited entries from .bib files
//! - sweep: the whole pipeline over a directory

pub mod bib;
pub mod check_links;
pub mod extract;
pub mod probe;
pub mod prune;
pub mod report;
pub mod scan;
pub mod sweep;

pub use bib::{parse_entries, parse_keys, BibEntries};
pub use check_links::{check_links, CheckLinksConfig, LinkReport, LinkResult};
pub use extract::{extract_urls, CitationExtractor, CiteCommand};
pub use prune::{prune_file, uncited, WriteMode};
pub use report::SweepReport;
pub use sweep::{sweep, SweepConfig};
