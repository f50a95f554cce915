//! Classification of shell commands, IPython magics and cell metadata.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::CmdParserError;
use crate::model::{BlockKind, LineKind};

use super::tags::is_tags_line;

/// Short-form MyST cell option, `:key: value`.
static CELL_OPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:[A-Za-z][\w-]*:(\s|$)").unwrap());

/// Returns true if `name` is a valid magic name.
fn is_magic_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Classifies a `%`-prefixed line given the text after its leading whitespace.
fn classify_magic(line: &str, trimmed: &str) -> Result<LineKind, CmdParserError> {
    let percents = trimmed.chars().take_while(|c| *c == '%').count();
    match percents {
        1 => Ok(LineKind::LineMagic),
        2 => {
            let name = trimmed[2..]
                .trim_start_matches([' ', '\t'])
                .split(|c: char| c.is_whitespace())
                .next()
                .unwrap_or("");
            if is_magic_name(name) {
                Ok(LineKind::CellMagic)
            } else {
                Err(CmdParserError {
                    line: line.to_string(),
                    message: "expected a cell magic name after '%%'".to_string(),
                })
            }
        }
        _ => Err(CmdParserError {
            line: line.to_string(),
            message: format!("{} leading '%' characters, at most two are allowed", percents),
        }),
    }
}

/// Classifies one body line, block indent already stripped.
///
/// Only the first non-space characters matter. Tag and option lines are
/// recognized in cell blocks only; elsewhere they are ordinary source.
pub fn classify_line(line: &str, kind: BlockKind) -> Result<LineKind, CmdParserError> {
    let trimmed = line.trim_start();

    if trimmed.starts_with('!') {
        return Ok(LineKind::Command);
    }
    if trimmed.starts_with('%') {
        return classify_magic(line, trimmed);
    }
    if kind == BlockKind::Cell {
        if is_tags_line(trimmed) {
            return Ok(LineKind::TagMetadata);
        }
        if CELL_OPTION.is_match(trimmed) {
            return Ok(LineKind::CellOption);
        }
    }
    Ok(LineKind::Source)
}
