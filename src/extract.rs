//! URL and citation extraction from LaTeX and BibTeX sources

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Liberal URL pattern: scheme-prefixed, `www.`-prefixed, or bare
/// `domain.tld/` URLs, allowing balanced parentheses inside and refusing
/// trailing punctuation.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:https?://|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’])"#,
    )
    .expect("URL pattern is valid")
});

/// Extract unique URLs from text content, in order of first appearance
pub fn extract_urls(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for mat in URL_RE.find_iter(content) {
        let url = mat.as_str();
        if seen.insert(url) {
            urls.push(url.to_string());
        }
    }

    urls
}

/// Source of citation keys in markup text.
///
/// The regex-based [`CiteCommand`] is the only implementation today; a
/// comment-aware LaTeX reader can slot in here later.
pub trait CitationExtractor {
    /// Keys referenced in `text`, in order, duplicates included.
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Finds `\cite{a,b}`-style commands on a single line.
///
/// The argument runs to the first `}` and is split on commas. Pieces are kept
/// verbatim: `\cite{a, b}` yields `"a"` and `" b"`.
#[derive(Debug, Clone)]
pub struct CiteCommand {
    re: Regex,
}

impl CiteCommand {
    /// Match only `\cite`.
    pub fn new() -> Self {
        Self::with_commands(&["cite"])
    }

    /// Match any of the given command names (without the backslash).
    pub fn with_commands<S: AsRef<str>>(commands: &[S]) -> Self {
        let alternation = commands
            .iter()
            .map(|c| regex::escape(c.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"\\(?:{alternation})\{{.*?\}}");
        let re = Regex::new(&pattern).expect("escaped command names form a valid pattern");
        Self { re }
    }
}

impl Default for CiteCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationExtractor for CiteCommand {
    fn extract(&self, text: &str) -> Vec<String> {
        self.re
            .find_iter(text)
            .filter_map(|m| {
                let arg = m.as_str().split('{').nth(1)?;
                arg.split('}').next()
            })
            .flat_map(|arg| arg.split(','))
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_citations(text: &str) -> Vec<String> {
        CiteCommand::new().extract(text)
    }

    #[test]
    fn test_extract_urls() {
        let content = r#"
            Check out https://example.com and
            \url{https://foo.bar/path?q=1} for more.
            Also http://old.site.org.
        "#;

        let urls = extract_urls(content);
        assert_eq!(urls.len(), 3);
        assert!(urls.contains(&"https://example.com".to_string()));
        assert!(urls.contains(&"https://foo.bar/path?q=1".to_string()));
        assert!(urls.contains(&"http://old.site.org".to_string()));
    }

    #[test]
    fn test_extract_urls_dedup() {
        let content = "https://dup.com https://dup.com https://dup.com";
        let urls = extract_urls(content);
        assert_eq!(urls, vec!["https://dup.com".to_string()]);
    }

    #[test]
    fn test_extract_urls_www_and_parens() {
        let content = "see www.example.org/page and https://en.wikipedia.org/wiki/Rust_(language).";
        let urls = extract_urls(content);
        assert_eq!(
            urls,
            vec![
                "www.example.org/page".to_string(),
                "https://en.wikipedia.org/wiki/Rust_(language)".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_urls_in_bib_field() {
        let content = "@misc{web,\n  url={https://example.com/data}\n}";
        assert_eq!(extract_urls(content), vec!["https://example.com/data"]);
    }

    #[test]
    fn test_extract_citations_multi_key() {
        let text = r"As shown \cite{a,b} and later \cite{c}.";
        assert_eq!(extract_citations(text), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_citations_keeps_spaces() {
        let text = r"\cite{a, b}";
        assert_eq!(extract_citations(text), vec!["a", " b"]);
    }

    #[test]
    fn test_extract_citations_ignores_other_commands() {
        let text = r"\citep{x} \citet{y} \cite{z}";
        assert_eq!(extract_citations(text), vec!["z"]);
    }

    #[test]
    fn test_extract_citations_does_not_cross_lines() {
        let text = "\\cite{a,\nb}";
        assert!(extract_citations(text).is_empty());
    }

    #[test]
    fn test_cite_command_with_extra_commands() {
        let extractor = CiteCommand::with_commands(&["cite", "citep", "citet"]);
        let text = r"\citep{x} \citet{y,w} \cite{z} \parencite{n}";
        assert_eq!(extractor.extract(text), vec!["x", "y", "w", "z"]);
    }

    #[test]
    fn test_extract_citations_empty_argument() {
        assert_eq!(extract_citations(r"\cite{}"), vec![""]);
    }
}
