//! The source formatter seam.
//!
//! The engine never formats code itself. It hands each run of source lines
//! to a [`SourceFormatter`] and splices whatever comes back into the document.

mod black;
mod target_version;

use std::collections::BTreeSet;

use thiserror::Error;

pub use black::BlackFormatter;
pub use target_version::{validate_targets, TargetVersion};

use crate::errors::{BlackenError, Result};

/// Default maximum line length, matching black.
pub const DEFAULT_LINE_LENGTH: usize = 88;

/// Options passed through to the formatter for every block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum line length.
    pub line_length: usize,
    /// Python versions the output must stay compatible with. Empty means
    /// "infer per source".
    pub target_versions: BTreeSet<TargetVersion>,
    /// Whether string quotes are normalized.
    pub string_normalization: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            line_length: DEFAULT_LINE_LENGTH,
            target_versions: BTreeSet::new(),
            string_normalization: true,
        }
    }
}

impl FormatOptions {
    /// Sets the line length.
    pub fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    /// Adds a target version.
    pub fn with_target(mut self, version: TargetVersion) -> Self {
        self.target_versions.insert(version);
        self
    }

    /// Checks the options once, before any block is formatted.
    pub fn validate(&self) -> Result<()> {
        if self.line_length == 0 {
            return Err(BlackenError::Config(
                "line length must be greater than zero".to_string(),
            ));
        }
        validate_targets(&self.target_versions)
    }
}

/// Why a formatter rejected a piece of source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The source does not parse. `line` is 1-based and relative to the
    /// text that was passed in; `column` is reported as the formatter gives it.
    #[error("cannot parse {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// The formatter could not run or failed without a parse location.
    #[error("formatter failed: {0}")]
    Failed(String),
}

/// Formats a complete piece of source text.
pub trait SourceFormatter {
    /// Returns the formatted text for `source`.
    fn format(&self, source: &str, options: &FormatOptions) -> std::result::Result<String, FormatError>;
}

impl<F> SourceFormatter for F
where
    F: Fn(&str, &FormatOptions) -> std::result::Result<String, FormatError>,
{
    fn format(&self, source: &str, options: &FormatOptions) -> std::result::Result<String, FormatError> {
        self(source, options)
    }
}
