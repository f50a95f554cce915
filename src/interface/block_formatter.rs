//! Formatting of a single code block.
//!
//! The body is classified line by line, split into maximal runs of source
//! lines separated by artifacts, and every run is formatted on its own.
//! Artifacts never move relative to the runs around them.

use crate::errors::{BlockErrorKind, CellOptionsError};
use crate::formatter::{FormatError, FormatOptions, SourceFormatter};
use crate::model::{BlockError, BodyLine, CodeBlock, LineKind};
use crate::readers::{classify_line, parse_tags, split_ending, strip_indent, Tags};
use crate::text_location::TextLocation;

/// Delimiter of a MyST YAML option header.
const YAML_HEADER_DELIMITER: &str = "---";

/// A block after formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBlock {
    /// The new body text, indent and line endings included.
    pub body: String,
    /// True if `body` differs from the original body.
    pub changed: bool,
    /// Tags declared by the cell, if any.
    pub tags: Option<Tags>,
}

/// A stretch of the body: a run of source lines, or one artifact.
#[derive(Debug)]
enum Segment<'a> {
    /// Index of the first line in the body, and the lines.
    Source(usize, Vec<&'a BodyLine>),
    Artifact(&'a BodyLine),
}

/// Formats blocks with a given formatter and options.
pub struct BlockFormatter<'a> {
    formatter: &'a dyn SourceFormatter,
    options: &'a FormatOptions,
}

impl<'a> BlockFormatter<'a> {
    pub fn new(formatter: &'a dyn SourceFormatter, options: &'a FormatOptions) -> Self {
        Self { formatter, options }
    }

    /// Formats `block`, whose lines are taken from `lines` (the whole document).
    ///
    /// On failure the caller must keep the original body.
    pub fn format_block(&self, block: &CodeBlock, lines: &[&str]) -> Result<FormattedBlock, BlockError> {
        let body = &lines[block.start_line..block.end_line];
        let original: String = body.concat();

        let (classified, tags) = classify_body(block, body)
            .map_err(|kind| BlockError::new(block.location(), kind))?;

        let newline = classified
            .first()
            .map(|l| l.ending.as_str())
            .filter(|e| !e.is_empty())
            .unwrap_or("\n");

        let mut output = String::with_capacity(original.len());
        for segment in segments(&classified) {
            match segment {
                Segment::Artifact(line) => {
                    output.push_str(line.preserved());
                    output.push_str(&line.ending);
                }
                Segment::Source(first, run) => {
                    self.format_run(block, first, &run, newline, &mut output)?;
                }
            }
        }

        let changed = output != original;
        tracing::debug!(
            "Block at line {} ({} lines): {}",
            block.fence_line + 1,
            block.body_len(),
            if changed { "reformatted" } else { "unchanged" }
        );

        Ok(FormattedBlock {
            body: output,
            changed,
            tags,
        })
    }

    /// Formats one source run and appends the re-indented result.
    fn format_run(
        &self,
        block: &CodeBlock,
        first: usize,
        run: &[&BodyLine],
        newline: &str,
        output: &mut String,
    ) -> Result<(), BlockError> {
        // Blank lines at the edges separate the run from its neighbouring
        // artifacts. The formatter would strip them, so they bypass it.
        let leading = run.iter().take_while(|l| l.is_blank()).count();
        if leading == run.len() {
            push_verbatim(run, output);
            return Ok(());
        }
        let trailing = run.iter().rev().take_while(|l| l.is_blank()).count();
        let code = &run[leading..run.len() - trailing];

        let mut source = String::new();
        for line in code {
            source.push_str(&line.text);
            source.push('\n');
        }

        let formatted = self
            .formatter
            .format(&source, self.options)
            .map_err(|e| run_error(block, first + leading, e))?;

        push_verbatim(&run[..leading], output);
        for line in formatted.lines() {
            if !line.trim().is_empty() {
                output.push_str(&block.indent);
                output.push_str(line);
            }
            output.push_str(newline);
        }
        push_verbatim(&run[run.len() - trailing..], output);
        Ok(())
    }
}

/// Appends lines exactly as they were written.
fn push_verbatim(lines: &[&BodyLine], output: &mut String) {
    for line in lines {
        output.push_str(&line.raw);
        output.push_str(&line.ending);
    }
}

/// Maps a formatter failure inside a run to a block error.
fn run_error(block: &CodeBlock, first: usize, error: FormatError) -> BlockError {
    let position = match &error {
        // Syntax lines are 1-based within the run; the run starts `first`
        // lines into the body, which starts one line after the fence.
        FormatError::Syntax { line, column, .. } => Some(
            block
                .location()
                .offset(1 + first + line.saturating_sub(1))
                .with_column(*column),
        ),
        FormatError::Failed(_) => None,
    };
    let err = BlockError::new(block.location(), error);
    match position {
        Some(position) => err.at(position),
        None => err,
    }
}

/// Classifies every body line, honoring the cell magic freeze and the YAML
/// option header of cells.
fn classify_body(block: &CodeBlock, body: &[&str]) -> Result<(Vec<BodyLine>, Option<Tags>), BlockErrorKind> {
    let mut classified = Vec::with_capacity(body.len());
    let mut tags: Option<Tags> = None;
    let mut frozen = false;
    let mut in_header = false;
    let mut header = String::new();
    // Short-form options are only recognized before the first other line.
    let mut in_options = block.is_cell();

    for (index, raw_line) in body.iter().enumerate() {
        let (raw, ending) = split_ending(raw_line);
        let text = strip_indent(raw, &block.indent);

        let kind = if frozen {
            LineKind::Frozen
        } else if in_header {
            if text.trim_end() == YAML_HEADER_DELIMITER {
                validate_header(&header)?;
                in_header = false;
            } else {
                header.push_str(text);
                header.push('\n');
            }
            LineKind::CellOption
        } else if index == 0 && block.is_cell() && text.trim_end() == YAML_HEADER_DELIMITER {
            in_header = true;
            LineKind::CellOption
        } else {
            match classify_line(text, block.kind)? {
                LineKind::CellOption if !in_options => LineKind::Source,
                LineKind::TagMetadata => {
                    let parsed = parse_tags(text)?;
                    tags.get_or_insert_with(Tags::new).extend(parsed);
                    LineKind::TagMetadata
                }
                LineKind::CellMagic => {
                    frozen = true;
                    LineKind::CellMagic
                }
                kind => kind,
            }
        };

        if !matches!(kind, LineKind::CellOption | LineKind::TagMetadata) {
            in_options = false;
        }

        classified.push(BodyLine {
            kind,
            raw: raw.to_string(),
            text: text.to_string(),
            ending: ending.to_string(),
        });
    }

    if in_header {
        return Err(CellOptionsError("unterminated '---' option header".to_string()).into());
    }

    Ok((classified, tags))
}

/// Checks that a YAML option header describes a mapping.
fn validate_header(header: &str) -> Result<(), CellOptionsError> {
    if header.trim().is_empty() {
        return Ok(());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(header).map_err(|e| CellOptionsError(e.to_string()))?;
    if value.is_mapping() {
        Ok(())
    } else {
        Err(CellOptionsError("option header must be a mapping".to_string()))
    }
}

/// Groups classified lines into source runs and single artifacts.
fn segments(lines: &[BodyLine]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if line.kind.is_artifact() {
            segments.push(Segment::Artifact(line));
            continue;
        }
        match segments.last_mut() {
            Some(Segment::Source(_, run)) => run.push(line),
            _ => segments.push(Segment::Source(index, vec![line])),
        }
    }
    segments
}
