//! BibTeX entry tokenizer
//!
//! Splits raw `.bib` text into entries by counting braces, and pulls out each
//! entry's citation key. This is not a BibTeX parser: quoted field values,
//! escapes and `@comment` blocks get no special treatment.
//!
//! An entry starts at `@` and ends as soon as the number of `{` seen equals the
//! number of `}` seen (and is non-zero). The counters are plain tallies, not a
//! depth stack, so only net balance matters.
//!
//! The key is everything between the first `{` and the first comma seen while
//! exactly one `{` and no `}` have been counted. Known limitations:
//!
//! - a key that itself contains a comma is cut at that comma;
//! - an entry with no comma before its closing brace gets the `}` appended to
//!   its key (`@misc{foo}` has key `foo}`);
//! - an entry that never balances (truncated file, stray `@`) is dropped
//!   without any error;
//! - braces that balance before any `@` (e.g. `{junk}` at the top of a file)
//!   reset the counters but record nothing. Tools that record an empty key
//!   there report one more reference whenever such text occurs.

use std::collections::{BTreeSet, HashMap};

/// Entries of one bibliography text, keyed by citation key.
///
/// Iteration follows the position where a key was first seen. A duplicate key
/// replaces the earlier text but keeps the earlier position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibEntries {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl BibEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; a later entry with the same key wins.
    pub fn insert(&mut self, key: String, text: String) {
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1 = text,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, text));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, text)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Scan state for a single pass. A fresh one is built for every call.
#[derive(Debug, Default)]
struct EntryScanner {
    in_entry: bool,
    key_done: bool,
    open_count: usize,
    close_count: usize,
    text: String,
    key: String,
}

impl EntryScanner {
    /// Feed one character; returns a finished `(key, text)` pair when the
    /// braces balance out.
    fn push(&mut self, c: char) -> Option<(String, String)> {
        if c == '@' {
            self.in_entry = true;
        }

        if self.in_entry {
            self.text.push(c);

            // Checked before the counters move, so the opening `{` is not
            // part of the key.
            if self.open_count == 1 && self.close_count == 0 && !self.key_done {
                if c == ',' {
                    self.key_done = true;
                } else {
                    self.key.push(c);
                }
            }
        }

        match c {
            '{' => self.open_count += 1,
            '}' => self.close_count += 1,
            _ => {}
        }

        if self.open_count == self.close_count && self.open_count != 0 {
            let finished = std::mem::take(self);
            // Balanced braces outside any entry carry no key.
            if finished.in_entry {
                return Some((finished.key, finished.text));
            }
        }

        None
    }
}

/// Split bibliography text into entries keyed by citation key.
///
/// Never fails: anything that does not form a balanced `@...{...}` span is
/// ignored.
pub fn parse_entries(text: &str) -> BibEntries {
    let mut scanner = EntryScanner::default();
    let mut entries = BibEntries::new();

    for c in text.chars() {
        if let Some((key, entry)) = scanner.push(c) {
            entries.insert(key, entry);
        }
    }

    if scanner.in_entry {
        tracing::debug!(
            key = %scanner.key,
            "dropping unterminated trailing entry"
        );
    }

    entries
}

/// Citation keys only. Duplicates collapse.
pub fn parse_keys(text: &str) -> BTreeSet<String> {
    parse_entries(text).keys().map(String::from).collect()
}
