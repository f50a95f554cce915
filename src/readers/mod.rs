//! Readers for scanning documents and classifying block contents.

mod fences;
mod lines;
mod magic;
mod tags;

pub use fences::{scan_blocks, scan_document};
pub use lines::{split_ending, split_lines, strip_indent};
pub use magic::classify_line;
pub use tags::{is_tags_line, parse_tags, Tags, TAGS_MARKER};
