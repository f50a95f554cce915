//! Classified lines of a block body.

/// What a body line is, as far as formatting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Regular source, sent to the formatter.
    Source,
    /// Shell escape, `!pip install ...`.
    Command,
    /// Line magic, `%matplotlib inline`.
    LineMagic,
    /// Cell magic, `%%timeit`. Freezes the rest of the block.
    CellMagic,
    /// `:tags: [...]` cell metadata.
    TagMetadata,
    /// Other MyST cell options, short `:key: value` form or a `---` YAML header.
    CellOption,
    /// Any line after a cell magic.
    Frozen,
}

impl LineKind {
    /// Returns true for lines the formatter never sees.
    pub fn is_artifact(&self) -> bool {
        !matches!(self, LineKind::Source)
    }

    /// Returns true if the line is kept byte-for-byte, trailing whitespace
    /// included.
    pub fn is_verbatim(&self) -> bool {
        matches!(self, LineKind::CellMagic | LineKind::Frozen)
    }
}

/// One body line together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLine {
    pub kind: LineKind,
    /// The original line without its line ending, indent included.
    pub raw: String,
    /// The line with the block indent removed.
    pub text: String,
    /// `"\n"`, `"\r\n"`, or empty for a final unterminated line.
    pub ending: String,
}

impl BodyLine {
    /// Returns the text to emit for an artifact line.
    pub fn preserved(&self) -> &str {
        if self.kind.is_verbatim() {
            &self.raw
        } else {
            self.raw.trim_end_matches([' ', '\t'])
        }
    }

    /// Returns true if the line holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
