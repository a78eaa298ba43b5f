//! Line-numbered program source.
//!
//! A [`SourceBuffer`] holds the text the user edits, keyed by line number.
//! Files use one `<number> <text>` entry per line; the buffer is the only
//! place those numbers live, and [`SourceBuffer::lines`] hands them to the
//! loader for fault reporting.

use crate::warn;
use mepa_derive::Error;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read '{path}': {source}")]
    Read { path: String, source: std::io::Error },

    #[error("cannot write '{path}': {source}")]
    Write { path: String, source: std::io::Error },

    #[error("line {line} does not exist")]
    MissingLine { line: u32 },

    #[error("invalid range: {start} is after {end}")]
    InvalidRange { start: u32, end: u32 },

    #[error("no file associated with the buffer")]
    NoFileName,
}

/// Splits `"120 CRVL 2"` into `(120, "CRVL 2")`.
fn parse_numbered(raw: &str) -> Option<(u32, &str)> {
    let raw = raw.trim();
    let (number, rest) = match raw.split_once(char::is_whitespace) {
        Some((number, rest)) => (number, rest.trim()),
        None => (raw, ""),
    };
    Some((number.parse().ok()?, rest))
}

/// Program text keyed by line number.
#[derive(Clone, Debug, Default)]
pub struct SourceBuffer {
    lines: BTreeMap<u32, String>,
    filename: Option<PathBuf>,
    modified: bool,
    revision: u64,
}

impl SourceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the buffer with the contents of `path`.
    ///
    /// Blank lines are ignored and lines without a valid leading number are
    /// skipped with a warning. The buffer is left untouched if the file
    /// cannot be read.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), SourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut lines = BTreeMap::new();
        for (idx, raw) in content.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            match parse_numbered(raw) {
                Some((number, text)) => {
                    lines.insert(number, text.to_string());
                }
                None => warn!(
                    "{}:{}: skipping line without a valid line number",
                    path.display(),
                    idx + 1
                ),
            }
        }

        self.lines = lines;
        self.filename = Some(path.to_path_buf());
        self.modified = false;
        self.revision += 1;
        Ok(())
    }

    /// Writes the buffer to `path`, or to the current file when `None`.
    pub fn save_file(&mut self, path: Option<&Path>) -> Result<(), SourceError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.filename.clone().ok_or(SourceError::NoFileName)?,
        };

        let mut content = String::new();
        for entry in self.listing() {
            content.push_str(&entry);
            content.push('\n');
        }
        fs::write(&path, content).map_err(|source| SourceError::Write {
            path: path.display().to_string(),
            source,
        })?;

        self.filename = Some(path);
        self.modified = false;
        Ok(())
    }

    /// Inserts or replaces a line, returning the replaced text.
    pub fn insert(&mut self, number: u32, text: impl Into<String>) -> Option<String> {
        self.touch();
        self.lines.insert(number, text.into())
    }

    /// Removes one line.
    pub fn delete(&mut self, number: u32) -> Result<String, SourceError> {
        let removed = self
            .lines
            .remove(&number)
            .ok_or(SourceError::MissingLine { line: number })?;
        self.touch();
        Ok(removed)
    }

    /// Removes every line numbered within `start..=end`.
    pub fn delete_range(&mut self, start: u32, end: u32) -> Result<Vec<(u32, String)>, SourceError> {
        if start > end {
            return Err(SourceError::InvalidRange { start, end });
        }
        let numbers: Vec<u32> = self.lines.range(start..=end).map(|(n, _)| *n).collect();
        let removed: Vec<(u32, String)> = numbers
            .into_iter()
            .filter_map(|n| self.lines.remove(&n).map(|text| (n, text)))
            .collect();
        if !removed.is_empty() {
            self.touch();
        }
        Ok(removed)
    }

    pub fn get(&self, number: u32) -> Option<&str> {
        self.lines.get(&number).map(String::as_str)
    }

    /// `"<number> <text>"` entries in line order.
    pub fn listing(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|(number, text)| format!("{number} {text}"))
            .collect()
    }

    /// `(number, text)` pairs in line order.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.lines.iter().map(|(n, text)| (*n, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Whether the buffer changed since it was last loaded or saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Bumped on every load and edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.modified = true;
        self.revision += 1;
    }
}
