//! Removal of uncited entries from bibliography files
//!
//! The rewrite keeps only entries, joined by a blank line. Anything between
//! entries (comments, stray text) is lost, as is every uncited entry. In-place
//! mode has no backup.

use crate::bib::{parse_entries, BibEntries};
use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Where pruned output goes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Overwrite each `.bib` file
    #[default]
    InPlace,
    /// Compute everything, write nothing
    DryRun,
    /// Write to the same relative path under another directory
    OutputDir { root: PathBuf, out: PathBuf },
}

/// Keys declared in bibliographies but never cited
pub fn uncited<'a, I, J>(declared: I, cited: J) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
    J: IntoIterator<Item = &'a String>,
{
    let cited: BTreeSet<&String> = cited.into_iter().collect();
    declared
        .into_iter()
        .filter(|key| !cited.contains(key))
        .cloned()
        .collect()
}

/// Entry texts whose key is not in `uncited`, in file order
pub fn filter_entries<'a>(entries: &'a BibEntries, uncited: &BTreeSet<String>) -> Vec<&'a str> {
    entries
        .iter()
        .filter(|(key, _)| !uncited.contains(*key))
        .map(|(_, text)| text)
        .collect()
}

/// Serialize kept entries separated by a blank line
pub fn render(entries: &[&str]) -> String {
    entries.join("\n\n")
}

/// Outcome of pruning one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneOutcome {
    pub source: PathBuf,
    /// Where the result was written; `None` for a dry run
    pub written_to: Option<PathBuf>,
    pub kept: usize,
    pub removed: usize,
}

/// Re-read `path`, drop uncited entries, and write according to `mode`
pub async fn prune_file(
    path: &Path,
    uncited: &BTreeSet<String>,
    mode: &WriteMode,
) -> Result<PruneOutcome> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let entries = parse_entries(&text);
    let kept = filter_entries(&entries, uncited);
    let removed = entries.len() - kept.len();
    let output = render(&kept);

    let target = match mode {
        WriteMode::InPlace => Some(path.to_path_buf()),
        WriteMode::DryRun => None,
        WriteMode::OutputDir { root, out } => Some(mirror_path(path, root, out)?),
    };

    if let Some(target) = &target {
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(target, output)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::info!(
            file = %target.display(),
            kept = kept.len(),
            removed,
            "wrote pruned bibliography"
        );
    } else {
        tracing::info!(
            file = %path.display(),
            kept = kept.len(),
            removed,
            "dry run, bibliography left untouched"
        );
    }

    Ok(PruneOutcome {
        source: path.to_path_buf(),
        written_to: target,
        kept: kept.len(),
        removed,
    })
}

/// `path` re-rooted from `root` to `out`. `./` components are ignored on both
/// sides, since glob results drop them.
fn mirror_path(path: &Path, root: &Path, out: &Path) -> Result<PathBuf> {
    let path = without_cur_dir(path);
    let root = without_cur_dir(root);
    match path.strip_prefix(&root) {
        Ok(relative) => Ok(out.join(relative)),
        Err(_) => bail!(
            "{} is not under input directory {}",
            path.display(),
            root.display()
        ),
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BIB: &str = "@article{a, title={Alpha}}\n\n@book{b, title={Beta, {B}}}\n\n@misc{c, title={Gamma}}\n";

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_uncited_set_difference() {
        let declared = keys(&["a", "b", "c"]);
        let cited = keys(&["a", "c"]);
        assert_eq!(uncited(&declared, &cited), keys(&["b"]));
    }

    #[test]
    fn test_uncited_ignores_extra_citations() {
        let declared = keys(&["a"]);
        let cited = keys(&["a", "missing"]);
        assert!(uncited(&declared, &cited).is_empty());
    }

    #[test]
    fn test_filter_and_render() {
        let entries = parse_entries(BIB);
        let kept = filter_entries(&entries, &keys(&["b"]));
        assert_eq!(
            render(&kept),
            "@article{a, title={Alpha}}\n\n@misc{c, title={Gamma}}"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_mirror_path() {
        let root = Path::new("/doc");
        let out = Path::new("/out");
        assert_eq!(
            mirror_path(Path::new("/doc/refs/main.bib"), root, out).unwrap(),
            PathBuf::from("/out/refs/main.bib")
        );
    }

    #[test]
    fn test_mirror_path_relative_roots() {
        let out = Path::new("out");
        assert_eq!(
            mirror_path(Path::new("p/a/refs.bib"), Path::new("./p"), out).unwrap(),
            PathBuf::from("out/a/refs.bib")
        );
        assert_eq!(
            mirror_path(Path::new("b/refs.bib"), Path::new("."), out).unwrap(),
            PathBuf::from("out/b/refs.bib")
        );
        assert_eq!(
            mirror_path(Path::new("./p/refs.bib"), Path::new("p/"), out).unwrap(),
            PathBuf::from("out/refs.bib")
        );
    }

    #[test]
    fn test_mirror_path_outside_root_is_error() {
        let err = mirror_path(
            Path::new("/elsewhere/x.bib"),
            Path::new("/doc"),
            Path::new("/out"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not under input directory"));
    }

    #[tokio::test]
    async fn test_prune_file_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refs.bib");
        fs::write(&path, BIB).unwrap();

        let outcome = prune_file(&path, &keys(&["b"]), &WriteMode::InPlace)
            .await
            .unwrap();

        assert_eq!(outcome.kept, 2);
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.written_to.as_deref(), Some(path.as_path()));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "@article{a, title={Alpha}}\n\n@misc{c, title={Gamma}}"
        );
        assert!(!written.contains("Beta"));
    }

    #[tokio::test]
    async fn test_prune_file_dry_run_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refs.bib");
        fs::write(&path, BIB).unwrap();

        let outcome = prune_file(&path, &keys(&["b"]), &WriteMode::DryRun)
            .await
            .unwrap();

        assert_eq!(outcome.written_to, None);
        assert_eq!(outcome.removed, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), BIB);
    }

    #[tokio::test]
    async fn test_prune_file_output_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("doc");
        let out = dir.path().join("pruned");
        fs::create_dir_all(root.join("refs")).unwrap();
        let path = root.join("refs/main.bib");
        fs::write(&path, BIB).unwrap();

        let mode = WriteMode::OutputDir {
            root: root.clone(),
            out: out.clone(),
        };
        let outcome = prune_file(&path, &keys(&["a", "c"]), &mode).await.unwrap();

        let target = out.join("refs/main.bib");
        assert_eq!(outcome.written_to.as_deref(), Some(target.as_path()));
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "@book{b, title={Beta, {B}}}"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), BIB);
    }

    #[tokio::test]
    async fn test_prune_file_missing() {
        let dir = tempdir().unwrap();
        let err = prune_file(
            &dir.path().join("nope.bib"),
            &BTreeSet::new(),
            &WriteMode::DryRun,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
