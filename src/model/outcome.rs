//! Per-block errors and whole-run results.

use std::fmt;
use std::path::Path;

use crate::errors::BlockErrorKind;
use crate::text_location::TextLocation;

/// A block that could not be formatted. The block is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockError {
    /// Location of the block's opening fence.
    pub location: TextLocation,
    /// Absolute document position of a syntax error, when the formatter
    /// reported one.
    pub position: Option<TextLocation>,
    pub kind: BlockErrorKind,
}

impl BlockError {
    /// Creates an error for the block opening at `location`.
    pub fn new(location: TextLocation, kind: impl Into<BlockErrorKind>) -> Self {
        Self {
            location,
            position: None,
            kind: kind.into(),
        }
    }

    /// Attaches the absolute position of a syntax error.
    pub fn at(mut self, position: TextLocation) -> Self {
        self.position = Some(position);
        self
    }

    /// 1-based line of the opening fence.
    pub fn line(&self) -> usize {
        self.location.line
    }

    /// Attaches the document path to every location.
    pub fn with_filename(mut self, path: &Path) -> Self {
        self.location = self.location.with_filename(path);
        self.position = self.position.map(|p| p.with_filename(path));
        self
    }
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location.filename {
            Some(path) => write!(f, "{}:{}", path.display(), self.location.line)?,
            None => write!(f, "{}", self.location.line)?,
        }
        write!(f, ": code block parse error {}", self.kind)?;
        if let Some(position) = &self.position {
            write!(f, " (document line {}, column {})", position.line, position.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for BlockError {}

/// Result of running the engine over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// The reassembled document.
    pub text: String,
    /// Errors in block order.
    pub errors: Vec<BlockError>,
    /// True iff `text` differs from the input.
    pub modified: bool,
    /// Blocks found by the scanner.
    pub blocks_seen: usize,
    /// Blocks whose language matched and were sent to the formatter.
    pub blocks_formatted: usize,
}

impl RunResult {
    /// Returns true if the caller should report failure.
    ///
    /// A rewrite always counts; errors count unless they are skipped.
    pub fn exit_failure(&self, skip_errors: bool) -> bool {
        self.modified || (!self.errors.is_empty() && !skip_errors)
    }
}
