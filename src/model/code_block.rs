//! Fenced code block descriptors.

use crate::text_location::TextLocation;

/// Marker used by the directive that turns a fence into a notebook cell.
pub const CODE_CELL_DIRECTIVE: &str = "{code-cell}";

/// Whether a fence is a plain code block or a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// ```` ```python ````
    Plain,
    /// ```` ```{code-cell} python ````
    Cell,
}

/// The run of marker characters that opened a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    /// Either '`' or '~'.
    pub marker: char,
    /// Number of marker characters, at least three.
    pub length: usize,
}

impl Fence {
    /// Returns true if `line` (indent already removed) starts with a run that
    /// can close this fence, and returns what follows the run.
    pub fn closes<'a>(&self, line: &'a str) -> Option<&'a str> {
        let run = line.chars().take_while(|c| *c == self.marker).count();
        if run < self.length {
            return None;
        }
        // Marker characters are ASCII, so the run length is also its byte length.
        let rest = &line[run..];
        rest.chars()
            .all(|c| c == ' ' || c == '\t')
            .then_some(rest)
    }
}

/// One fenced region of a document.
///
/// Line numbers are 0-based indices into the document's lines. The body is
/// the half-open range `start_line..end_line`; both fences are excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Line of the opening fence.
    pub fence_line: usize,
    /// First body line.
    pub start_line: usize,
    /// One past the last body line; also the line of the closing fence.
    pub end_line: usize,
    /// Whitespace before the opening fence, shared by the closing fence.
    pub indent: String,
    pub fence: Fence,
    /// Everything after the opening fence, verbatim.
    pub language_tag: String,
    /// The language identifier with surrounding whitespace and the cell
    /// directive removed.
    pub language: String,
    /// Whitespace after the closing fence, verbatim.
    pub trailing_ws: String,
    pub kind: BlockKind,
}

impl CodeBlock {
    /// Returns true for `{code-cell}` blocks.
    pub fn is_cell(&self) -> bool {
        self.kind == BlockKind::Cell
    }

    /// Number of body lines.
    pub fn body_len(&self) -> usize {
        self.end_line - self.start_line
    }

    /// Location of the opening fence, used for error reports.
    pub fn location(&self) -> TextLocation {
        TextLocation::from_index(self.fence_line)
    }

    /// Returns true if the block's language is one of `languages`.
    pub fn matches_language(&self, languages: &[String]) -> bool {
        languages.iter().any(|l| *l == self.language)
    }
}
