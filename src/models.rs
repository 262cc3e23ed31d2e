use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::error::DumpError;

pub const HEADER_PREFIX: &str = "Path: ";
pub const READ_ERROR_PREFIX: &str = "Error reading file: ";
pub const RECORD_SEPARATOR: &str = "\n\n";

#[derive(Debug)]
pub enum RecordBody {
    Content(String),
    Unreadable(DumpError),
}

/// One path plus its content, or the error hit while reading it.
#[derive(Debug)]
pub struct Record {
    pub path: PathBuf,
    pub body: RecordBody,
}

impl Record {
    pub fn content(path: &Path, text: String) -> Self {
        Self {
            path: path.to_path_buf(),
            body: RecordBody::Content(text),
        }
    }

    pub fn unreadable(path: &Path, err: DumpError) -> Self {
        Self {
            path: path.to_path_buf(),
            body: RecordBody::Unreadable(err),
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self.body, RecordBody::Unreadable(_))
    }

    pub fn header(&self) -> String {
        format!("{}{}\n", HEADER_PREFIX, self.path.display())
    }

    /// Text that follows the header: raw content, or the inline error line.
    pub fn body_text(&self) -> Cow<'_, str> {
        match &self.body {
            RecordBody::Content(text) => Cow::Borrowed(text.as_str()),
            RecordBody::Unreadable(err) => Cow::Owned(format!("{}{}", READ_ERROR_PREFIX, err)),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub records: usize,
    pub unreadable: usize,
    pub bytes: u64,
}

pub struct ExcludePatterns {
    patterns: Vec<Regex>,
}

impl ExcludePatterns {
    pub fn new(sources: &[String]) -> Result<Self, DumpError> {
        let patterns = sources
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| DumpError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_match(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let text = path.to_string_lossy();
        self.patterns.iter().any(|p| p.is_match(&text))
    }
}
