//! Configuration data structures.

use serde::{Deserialize, Serialize};

use crate::formatter::{BlackFormatter, FormatOptions, TargetVersion, DEFAULT_LINE_LENGTH};
use crate::interface::{RunOptions, DEFAULT_LANGUAGES};

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum line length passed to the formatter.
    #[serde(default = "default_line_length")]
    pub line_length: usize,

    /// Python versions the formatted code must support.
    #[serde(default)]
    pub target_versions: Vec<TargetVersion>,

    /// Leave string quotes alone.
    #[serde(default)]
    pub skip_string_normalization: bool,

    /// Do not fail the run because of block errors.
    #[serde(default)]
    pub skip_errors: bool,

    /// Block languages to format.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Formatter command line, program first.
    #[serde(default = "default_formatter_command")]
    pub formatter_command: Vec<String>,
}

fn default_line_length() -> usize {
    DEFAULT_LINE_LENGTH
}

fn default_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect()
}

fn default_formatter_command() -> Vec<String> {
    vec!["black".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_length: default_line_length(),
            target_versions: Vec::new(),
            skip_string_normalization: false,
            skip_errors: false,
            languages: default_languages(),
            formatter_command: default_formatter_command(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter options for every block.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            line_length: self.line_length,
            target_versions: self.target_versions.iter().copied().collect(),
            string_normalization: !self.skip_string_normalization,
        }
    }

    /// Options for an engine run.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            format: self.format_options(),
            languages: self.languages.clone(),
            skip_errors: self.skip_errors,
        }
    }

    /// The external formatter this configuration describes.
    pub fn formatter(&self) -> BlackFormatter {
        BlackFormatter::new(self.formatter_command.clone())
    }
}
