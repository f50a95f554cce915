//! Document positions for error reporting.

use std::fmt;
use std::path::{Path, PathBuf};

/// A 1-based position within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextLocation {
    /// The document path, once known.
    pub filename: Option<PathBuf>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl TextLocation {
    /// Creates a location at the start of `line`.
    pub fn line_only(line: usize) -> Self {
        Self {
            filename: None,
            line,
            column: 1,
        }
    }

    /// Creates a location from a 0-based line index, as produced by the scanner.
    pub fn from_index(index: usize) -> Self {
        Self::line_only(index + 1)
    }

    /// Returns a new location pointing `column` characters into the line.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Returns a new location with updated filename.
    pub fn with_filename(mut self, filename: &Path) -> Self {
        self.filename = Some(filename.to_path_buf());
        self
    }

    /// Moves the location down by `lines`, keeping the column.
    pub fn offset(&self, lines: usize) -> Self {
        Self {
            filename: self.filename.clone(),
            line: self.line + lines,
            column: self.column,
        }
    }
}

impl Default for TextLocation {
    fn default() -> Self {
        Self::line_only(1)
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(path) => write!(f, "{}:{}", path.display(), self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}
