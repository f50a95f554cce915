//! blacken-docs-jb - format Python code blocks in Markdown and MyST documents
//!
//! Finds fenced Python blocks and MyST `{code-cell}` cells, hands their
//! source to an external formatter (black by default) and writes the result
//! back in place, keeping Jupyter artifacts intact.
//!
//! # Features
//!
//! - **Scanning**: backtick and tilde fences, indented fences, `{code-cell}` cells
//! - **Artifacts**: `!shell` commands, `%line` magics, `%%cell` magics and cell
//!   metadata (`:tags:`, options) are kept verbatim
//! - **Fail-safe**: a block that cannot be formatted is left untouched and
//!   reported, the rest of the document is still processed
//!
//! # Example
//!
//! ```no_run
//! use blacken_docs_jb::formatter::BlackFormatter;
//! use blacken_docs_jb::interface::{run, RunOptions};
//!
//! let result = run("```python\nf(1,2)\n```\n", &RunOptions::default(), &BlackFormatter::default()).unwrap();
//! assert_eq!(result.text, "```python\nf(1, 2)\n```\n");
//! ```

pub mod commands;
pub mod config;
pub mod errors;
pub mod formatter;
pub mod interface;
pub mod model;
pub mod readers;
pub mod text_location;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use errors::{BlackenError, Result};
pub use formatter::{FormatOptions, SourceFormatter, TargetVersion};
pub use interface::{run, RunOptions};
pub use model::{BlockError, CodeBlock, RunResult};

pub use commands::{rewrite, RewriteOptions, RewriteReport};
