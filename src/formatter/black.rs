//! Formatting through the `black` command line tool.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FormatError, FormatOptions, SourceFormatter};

/// Pattern for black's parse failure report on stderr.
static PARSE_ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Cannot parse(?: for target version [^:]+)?: (?P<line>\d+):(?P<col>\d+): ?(?P<msg>.*)")
        .unwrap()
});

/// Runs `black` as a subprocess, feeding the source through stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackFormatter {
    /// Program and leading arguments, e.g. `["black"]` or `["python", "-m", "black"]`.
    command: Vec<String>,
}

impl BlackFormatter {
    /// Creates a formatter for the given command line.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Builds the full argument list for one invocation.
    pub fn arguments(&self, options: &FormatOptions) -> Vec<String> {
        let mut args: Vec<String> = self.command.iter().skip(1).cloned().collect();
        args.push("--quiet".to_string());
        args.push("--line-length".to_string());
        args.push(options.line_length.to_string());
        for version in &options.target_versions {
            args.push("--target-version".to_string());
            args.push(version.name().to_string());
        }
        if !options.string_normalization {
            args.push("--skip-string-normalization".to_string());
        }
        args.push("-".to_string());
        args
    }
}

impl Default for BlackFormatter {
    fn default() -> Self {
        Self::new(vec!["black".to_string()])
    }
}

impl SourceFormatter for BlackFormatter {
    fn format(&self, source: &str, options: &FormatOptions) -> Result<String, FormatError> {
        let Some(program) = self.command.first() else {
            return Err(FormatError::Failed("empty formatter command".to_string()));
        };

        let mut child = Command::new(program)
            .args(self.arguments(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FormatError::Failed(format!("failed to spawn '{}': {}", program, e)))?;

        // Feed stdin from a separate thread so a large output cannot fill the
        // stdout pipe while we are still writing.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = source.to_string();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| FormatError::Failed(format!("failed to wait for '{}': {}", program, e)))?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    return Err(FormatError::Failed(format!(
                        "failed to write to '{}': {}",
                        program, e
                    )))
                }
                Err(_) => {
                    return Err(FormatError::Failed(
                        "stdin writer thread panicked".to_string(),
                    ))
                }
            }
        }

        if output.status.success() {
            return String::from_utf8(output.stdout)
                .map_err(|e| FormatError::Failed(format!("non UTF-8 output: {}", e)));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!("{} exited with {}: {}", program, output.status, stderr.trim());
        Err(parse_failure(&stderr).unwrap_or_else(|| {
            FormatError::Failed(format!("'{}' exited with {}: {}", program, output.status, stderr.trim()))
        }))
    }
}

/// Extracts a syntax error position from black's stderr, if it reported one.
fn parse_failure(stderr: &str) -> Option<FormatError> {
    let caps = PARSE_ERROR.captures(stderr)?;
    Some(FormatError::Syntax {
        line: caps["line"].parse().ok()?,
        column: caps["col"].parse().ok()?,
        message: caps["msg"].trim().to_string(),
    })
}
