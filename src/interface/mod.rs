//! High-level interface: formatting blocks and whole documents.

mod block_formatter;
mod document;

pub use block_formatter::{BlockFormatter, FormattedBlock};
pub use document::{run, RunOptions, DEFAULT_LANGUAGES};
