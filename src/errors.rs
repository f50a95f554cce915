//! Error types for blacken-docs-jb.
//!
//! Two layers: [`BlackenError`] aborts a whole run (bad configuration, I/O),
//! while [`BlockErrorKind`] is always caught at block granularity and turned
//! into a [`BlockError`](crate::model::BlockError).

use thiserror::Error;

use crate::formatter::FormatError;

/// Main error type for run-level failures.
#[derive(Error, Debug)]
pub enum BlackenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Unknown target version: {0}")]
    UnknownTargetVersion(String),

    #[error("Incompatible target versions: {0}")]
    IncompatibleTargets(String),
}

/// Result type alias for run-level operations.
pub type Result<T> = std::result::Result<T, BlackenError>;

/// A `:tags:` line that is not a valid list of string literals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid tag list at column {column}: {message} in {line:?}")]
pub struct TagParserError {
    /// The offending line, indent stripped.
    pub line: String,
    /// 1-based character column where parsing stopped.
    pub column: usize,
    pub message: String,
}

/// A malformed magic directive (`%%%...`, or `%%` without a name).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed magic directive: {message} in {line:?}")]
pub struct CmdParserError {
    pub line: String,
    pub message: String,
}

/// A MyST YAML option header that does not describe a mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid cell options: {0}")]
pub struct CellOptionsError(pub String);

/// Everything that can go wrong while formatting a single block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockErrorKind {
    #[error(transparent)]
    Tags(#[from] TagParserError),

    #[error(transparent)]
    Command(#[from] CmdParserError),

    #[error(transparent)]
    CellOptions(#[from] CellOptionsError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl BlockErrorKind {
    /// Returns true if the formatter rejected the block's source.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::Format(FormatError::Syntax { .. }))
    }
}
