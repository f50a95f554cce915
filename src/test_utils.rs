//! Shared test utilities.

use crate::formatter::{FormatError, FormatOptions, SourceFormatter};

/// A small, deterministic stand-in for black.
///
/// It knows just enough Python surface syntax for the engine tests:
/// comma and bracket spacing, comment spacing, quote normalization,
/// exploding an over-long call one argument per line, and unbalanced
/// brackets as syntax errors.
pub struct StubFormatter;

/// Fails the test if it is ever asked to format anything.
pub struct PanickingFormatter;

impl SourceFormatter for PanickingFormatter {
    fn format(&self, source: &str, _options: &FormatOptions) -> Result<String, FormatError> {
        panic!("formatter unexpectedly called with {:?}", source);
    }
}

impl SourceFormatter for StubFormatter {
    fn format(&self, source: &str, options: &FormatOptions) -> Result<String, FormatError> {
        let mut lines: Vec<String> = Vec::new();
        for statement in split_statements(source)? {
            if statement.text.is_empty() {
                let blanks = lines.iter().rev().take_while(|l| l.is_empty()).count();
                if !lines.is_empty() && blanks < 2 {
                    lines.push(String::new());
                }
            } else {
                lines.extend(render(&statement, options));
            }
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Ok(String::new());
        }
        Ok(lines.join("\n") + "\n")
    }
}

/// One logical line: a physical line plus its bracket continuations.
struct Statement {
    indent: String,
    text: String,
}

fn split_statements(source: &str) -> Result<Vec<Statement>, FormatError> {
    let mut statements = Vec::new();
    let mut open: Vec<(char, usize, usize)> = Vec::new();
    let mut current: Option<Statement> = None;

    for (index, line) in source.lines().enumerate() {
        scan_brackets(line, index + 1, &mut open)?;
        match current.as_mut() {
            Some(statement) => {
                statement.text.push(' ');
                statement.text.push_str(line.trim());
            }
            None => {
                let trimmed = line.trim_start();
                current = Some(Statement {
                    indent: line[..line.len() - trimmed.len()].to_string(),
                    text: trimmed.trim_end().to_string(),
                });
            }
        }
        if open.is_empty() {
            statements.extend(current.take());
        }
    }

    if let Some((bracket, line, column)) = open.first() {
        return Err(FormatError::Syntax {
            line: *line,
            column: *column,
            message: format!("'{}' was never closed", bracket),
        });
    }
    Ok(statements)
}

fn scan_brackets(
    line: &str,
    line_no: usize,
    open: &mut Vec<(char, usize, usize)>,
) -> Result<(), FormatError> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (col, c) in line.chars().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '#' => break,
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => open.push((c, line_no, col + 1)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match open.pop() {
                    Some((o, ..)) if o == expected => {}
                    _ => {
                        return Err(FormatError::Syntax {
                            line: line_no,
                            column: col + 1,
                            message: format!("unmatched '{}'", c),
                        })
                    }
                }
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(FormatError::Syntax {
            line: line_no,
            column: line.chars().count(),
            message: "unterminated string literal".to_string(),
        });
    }
    Ok(())
}

fn render(statement: &Statement, options: &FormatOptions) -> Vec<String> {
    let (code, comment) = split_comment(&statement.text);
    let code = normalize(code, options.string_normalization);
    let indent = &statement.indent;

    let Some(comment) = comment else {
        let line = format!("{}{}", indent, code);
        if line.chars().count() > options.line_length {
            if let Some((head, args)) = explode(&code) {
                let mut lines = vec![format!("{}{}(", indent, head)];
                lines.extend(args.iter().map(|arg| format!("{}    {},", indent, arg)));
                lines.push(format!("{})", indent));
                return lines;
            }
        }
        return vec![line];
    };

    let body = comment.trim_start_matches('#').trim();
    let comment = if body.is_empty() {
        "#".to_string()
    } else {
        format!("# {}", body)
    };
    if code.is_empty() {
        vec![format!("{}{}", indent, comment)]
    } else {
        vec![format!("{}{}  {}", indent, code, comment)]
    }
}

/// Splits off a trailing `#` comment that is not inside a string.
fn split_comment(text: &str) -> (&str, Option<&str>) {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '#' => return (&text[..i], Some(&text[i..])),
            _ => {}
        }
    }
    (text, None)
}

fn push_pending_space(out: &mut String, pending: &mut bool) {
    if *pending && !out.is_empty() && !out.ends_with(['(', '[', '{']) {
        out.push(' ');
    }
    *pending = false;
}

fn requote(literal: &str, normalize: bool) -> String {
    let inner = literal
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''));
    match inner {
        Some(inner) if normalize && !inner.contains(['"', '\\']) => format!("\"{}\"", inner),
        _ => literal.to_string(),
    }
}

/// Collapses whitespace and fixes spacing around commas and brackets.
fn normalize(code: &str, normalize_quotes: bool) -> String {
    let mut out = String::with_capacity(code.len());
    let mut pending = false;
    let mut chars = code.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut literal = String::from(c);
                let mut escaped = false;
                for n in chars.by_ref() {
                    literal.push(n);
                    if escaped {
                        escaped = false;
                    } else if n == '\\' {
                        escaped = true;
                    } else if n == c {
                        break;
                    }
                }
                push_pending_space(&mut out, &mut pending);
                out.push_str(&requote(&literal, normalize_quotes));
            }
            ',' => {
                out.push(',');
                pending = true;
            }
            ')' | ']' | '}' => {
                pending = false;
                out.push(c);
            }
            c if c.is_whitespace() => pending = true,
            c => {
                push_pending_space(&mut out, &mut pending);
                out.push(c);
            }
        }
    }
    out
}

/// Splits `head(arg, arg)` into its head and top-level arguments.
fn explode(code: &str) -> Option<(String, Vec<String>)> {
    let open = code.find('(')?;
    if open == 0 || !code.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut args = Vec::new();
    let mut start = open + 1;

    for (i, c) in code.char_indices().skip_while(|(i, _)| *i < open) {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    if i != code.len() - 1 {
                        return None;
                    }
                    args.push(code[start..i].trim().to_string());
                }
            }
            ',' if depth == 1 => {
                args.push(code[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }

    args.retain(|arg| !arg.is_empty());
    if args.is_empty() {
        return None;
    }
    Some((code[..open].to_string(), args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(source: &str) -> String {
        StubFormatter.format(source, &FormatOptions::default()).unwrap()
    }

    #[test]
    fn test_stub_spacing() {
        assert_eq!(stub("f(1,2,3)\n"), "f(1, 2, 3)\n");
        assert_eq!(stub("f( )\n"), "f()\n");
        assert_eq!(stub("x = [ 1,2 ]\n"), "x = [1, 2]\n");
    }

    #[test]
    fn test_stub_is_idempotent_on_exploded_calls() {
        let options = FormatOptions::default().with_line_length(20);
        let once = StubFormatter.format("call(argument_one, argument_two)\n", &options).unwrap();
        assert_eq!(once, "call(\n    argument_one,\n    argument_two,\n)\n");
        let twice = StubFormatter.format(&once, &options).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_stub_syntax_errors() {
        let err = StubFormatter.format("f(\n", &FormatOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FormatError::Syntax {
                line: 1,
                column: 2,
                message: "'(' was never closed".to_string(),
            }
        );
        assert!(StubFormatter.format("f)\n", &FormatOptions::default()).is_err());
    }

    #[test]
    fn test_stub_blank_lines() {
        assert_eq!(stub("\n\nx\n\n\n\n\ny\n\n"), "x\n\n\ny\n");
        assert_eq!(stub("\n"), "");
    }
}
