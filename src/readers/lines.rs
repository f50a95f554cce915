//! Line splitting that keeps line endings intact.

/// Splits `text` into lines, each keeping its `\n` or `\r\n`.
///
/// Concatenating the result gives back `text` exactly.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Splits a line into its content and its line ending.
pub fn split_ending(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

/// Removes `indent` from the start of `line`.
///
/// A line that does not carry the full indent loses only the leading
/// whitespace it has, up to the indent's width.
pub fn strip_indent<'a>(line: &'a str, indent: &str) -> &'a str {
    if let Some(rest) = line.strip_prefix(indent) {
        return rest;
    }
    let width = line
        .char_indices()
        .take(indent.chars().count())
        .take_while(|(_, c)| *c == ' ' || *c == '\t')
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &line[width..]
}
