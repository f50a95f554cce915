//! Fenced block scanning.
//!
//! A two-state machine walks the document once. `Outside` looks for an
//! opening fence; `InFence` carries everything needed to recognize the
//! matching close. A fence that is never closed is not a block: scanning
//! resumes on the line after it.
//!
//! Every closing line for a fence of length `n` also closes any shorter
//! fence with the same indent and marker. Once a fence has run off the end
//! of the document, later openers of that shape are known to be unclosed
//! and never scan ahead again, which keeps the scan linear.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{BlockKind, CodeBlock, Fence, CODE_CELL_DIRECTIVE};

use super::lines::{split_ending, split_lines};

/// Pattern for matching code fence openings.
static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>[ \t]*)(?P<fence>`{3,}|~{3,})(?P<info>.*)$").unwrap());

/// An opening fence waiting for its close.
#[derive(Debug, Clone)]
struct OpenFence {
    line: usize,
    indent: String,
    fence: Fence,
    language_tag: String,
    language: String,
    kind: BlockKind,
}

#[derive(Debug)]
enum ScanState {
    Outside,
    InFence(OpenFence),
}

/// Parses an opening fence line (line ending removed).
fn open_fence(index: usize, content: &str) -> Option<OpenFence> {
    let caps = FENCE_OPEN.captures(content)?;
    let fence_str = &caps["fence"];
    let info = &caps["info"];
    let marker = fence_str.chars().next()?;

    // Backtick fences cannot carry backticks in their info string.
    if marker == '`' && info.contains('`') {
        return None;
    }

    let (kind, language) = classify_info(info);
    Some(OpenFence {
        line: index,
        indent: caps["indent"].to_string(),
        fence: Fence {
            marker,
            length: fence_str.len(),
        },
        language_tag: info.to_string(),
        language,
        kind,
    })
}

/// Splits an info string into block kind and language.
fn classify_info(info: &str) -> (BlockKind, String) {
    let trimmed = info.trim_start();
    if let Some(rest) = trimmed.strip_prefix(CODE_CELL_DIRECTIVE) {
        if rest.is_empty() || rest.starts_with([' ', '\t']) {
            return (BlockKind::Cell, rest.trim().to_string());
        }
    }
    (BlockKind::Plain, info.trim().to_string())
}

/// Checks whether `content` closes `open`, returning the trailing whitespace.
fn close_fence<'a>(open: &OpenFence, content: &'a str) -> Option<&'a str> {
    let rest = content.strip_prefix(open.indent.as_str())?;
    open.fence.closes(rest)
}

/// Returns true if a fence at least as short as `open`, with the same indent
/// and marker, already ran to the end of the document from an earlier line.
fn is_known_unclosed(unclosed: &HashMap<(String, char), usize>, open: &OpenFence) -> bool {
    unclosed
        .get(&(open.indent.clone(), open.fence.marker))
        .is_some_and(|shortest| open.fence.length >= *shortest)
}

/// Scans document lines (line endings included) for fenced blocks.
pub fn scan_blocks(lines: &[&str]) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut state = ScanState::Outside;
    let mut index = 0;
    // Shortest unclosed fence length per (indent, marker).
    let mut unclosed: HashMap<(String, char), usize> = HashMap::new();

    loop {
        let Some(line) = lines.get(index) else {
            match state {
                ScanState::Outside => break,
                ScanState::InFence(open) => {
                    tracing::debug!(
                        "Unclosed fence at line {}, treating it as text",
                        open.line + 1
                    );
                    let shortest = unclosed
                        .entry((open.indent, open.fence.marker))
                        .or_insert(open.fence.length);
                    *shortest = (*shortest).min(open.fence.length);
                    index = open.line + 1;
                    state = ScanState::Outside;
                    continue;
                }
            }
        };
        let (content, _) = split_ending(line);

        state = match state {
            ScanState::Outside => match open_fence(index, content) {
                Some(open) if is_known_unclosed(&unclosed, &open) => ScanState::Outside,
                Some(open) => ScanState::InFence(open),
                None => ScanState::Outside,
            },
            ScanState::InFence(open) => match close_fence(&open, content) {
                Some(trailing_ws) => {
                    blocks.push(CodeBlock {
                        fence_line: open.line,
                        start_line: open.line + 1,
                        end_line: index,
                        trailing_ws: trailing_ws.to_string(),
                        indent: open.indent,
                        fence: open.fence,
                        language_tag: open.language_tag,
                        language: open.language,
                        kind: open.kind,
                    });
                    ScanState::Outside
                }
                None => ScanState::InFence(open),
            },
        };
        index += 1;
    }

    blocks
}

/// Convenience function to scan a whole document.
pub fn scan_document(text: &str) -> Vec<CodeBlock> {
    scan_blocks(&split_lines(text))
}
