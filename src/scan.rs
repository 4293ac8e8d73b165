//! Source file discovery
//!
//! Finds `.tex` and `.bib` files anywhere under a root directory. Hidden files
//! and anything inside hidden directories are skipped.

use glob::MatchOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("invalid search pattern for {root}: {source}")]
    Pattern {
        root: PathBuf,
        #[source]
        source: glob::PatternError,
    },

    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

/// LaTeX and BibTeX files found under a root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFiles {
    pub tex: Vec<PathBuf>,
    pub bib: Vec<PathBuf>,
}

impl SourceFiles {
    /// Every discovered file, tex first
    pub fn all(&self) -> impl Iterator<Item = &PathBuf> {
        self.tex.iter().chain(self.bib.iter())
    }
}

/// Recursively collect `*.tex` and `*.bib` files under `root`
pub fn discover(root: &Path) -> Result<SourceFiles, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let files = SourceFiles {
        tex: find_with_extension(root, "tex")?,
        bib: find_with_extension(root, "bib")?,
    };

    tracing::debug!(
        root = %root.display(),
        tex = files.tex.len(),
        bib = files.bib.len(),
        "discovered source files"
    );

    Ok(files)
}

fn find_with_extension(root: &Path, ext: &str) -> Result<Vec<PathBuf>, ScanError> {
    let root_str = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/*.{}", root_str.trim_end_matches('/'), ext);

    let mut files = Vec::new();
    // `**` and `*` must not match a leading dot.
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob::glob_with(&pattern, options).map_err(|source| ScanError::Pattern {
        root: root.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
