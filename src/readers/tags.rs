//! Parsing of `:tags: [...]` cell metadata lines.
//!
//! The value is a Python list literal of strings, e.g.
//! `:tags: ["hide-input", 'another_tag']`.

use indexmap::IndexSet;
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, multispace0, none_of},
    combinator::{opt, value},
    multi::{fold_many0, separated_list0},
    sequence::{delimited, preceded},
};

use crate::errors::TagParserError;

/// Marker that starts a tag metadata line.
pub const TAGS_MARKER: &str = ":tags:";

/// Tags of a cell, in the order they were written.
pub type Tags = IndexSet<String>;

/// Returns true if `line` (indent stripped) is a tag metadata line.
pub fn is_tags_line(line: &str) -> bool {
    line.trim_start().starts_with(TAGS_MARKER)
}

/// Parse a backslash escape inside a string literal.
fn parse_escape(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            value('\\', char('\\')),
            value('\'', char('\'')),
            value('"', char('"')),
            value('\n', char('n')),
            value('\t', char('t')),
            value('\r', char('r')),
        )),
    )
    .parse(input)
}

/// Parse a string literal delimited by `quote`.
fn parse_quoted(input: &str, quote: char) -> IResult<&str, String> {
    let forbidden = if quote == '"' { "\\\"\n" } else { "\\'\n" };
    delimited(
        char(quote),
        fold_many0(
            alt((parse_escape, none_of(forbidden))),
            String::new,
            |mut acc, c| {
                acc.push(c);
                acc
            },
        ),
        char(quote),
    )
    .parse(input)
}

fn parse_double_quoted(input: &str) -> IResult<&str, String> {
    parse_quoted(input, '"')
}

fn parse_single_quoted(input: &str) -> IResult<&str, String> {
    parse_quoted(input, '\'')
}

/// Parse a single string literal in either quote style.
fn parse_string(input: &str) -> IResult<&str, String> {
    alt((parse_double_quoted, parse_single_quoted)).parse(input)
}

/// Parse `[ "a", 'b', ]`. A trailing comma is only allowed after an element.
fn parse_list(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = (char('['), multispace0).parse(input)?;
    let (input, items) =
        separated_list0((multispace0, char(','), multispace0), parse_string).parse(input)?;
    let (input, _) = if items.is_empty() {
        (input, None)
    } else {
        opt((multispace0, char(','))).parse(input)?
    };
    let (input, _) = (multispace0, char(']')).parse(input)?;
    Ok((input, items))
}

/// Builds an error pointing at the first character of `remaining` in `line`.
///
/// `remaining` must be a suffix of `line`.
fn error_at(line: &str, remaining: &str, message: &str) -> TagParserError {
    let consumed = line.len().saturating_sub(remaining.len());
    TagParserError {
        line: line.to_string(),
        column: line[..consumed].chars().count() + 1,
        message: message.to_string(),
    }
}

/// Parses a tag metadata line into its tags.
pub fn parse_tags(line: &str) -> Result<Tags, TagParserError> {
    let Some(rest) = line.trim_start().strip_prefix(TAGS_MARKER) else {
        return Err(error_at(line, line, "expected ':tags:'"));
    };

    match delimited(multispace0, parse_list, multispace0).parse(rest) {
        Ok(("", items)) => Ok(items.into_iter().collect()),
        Ok((remaining, _)) => Err(error_at(line, remaining, "unexpected input after tag list")),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(error_at(
            line,
            e.input,
            "expected a list of string literals",
        )),
        Err(nom::Err::Incomplete(_)) => Err(error_at(line, "", "incomplete tag list")),
    }
}
