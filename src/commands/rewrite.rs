//! Rewrite command implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::formatter::SourceFormatter;
use crate::interface::{run, RunOptions};

/// Options for the rewrite command.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    /// Engine options shared by every file.
    pub run: RunOptions,
    /// Report files that would change without writing them.
    pub check: bool,
}

/// What happened across all files of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Files that were rewritten, or would be with `check`.
    pub rewritten: Vec<PathBuf>,
    /// Block errors plus files that could not be read or written.
    pub errors: usize,
}

impl RewriteReport {
    /// Returns true if the process should exit with a failure status.
    pub fn exit_failure(&self, skip_errors: bool) -> bool {
        !self.rewritten.is_empty() || (self.errors > 0 && !skip_errors)
    }
}

/// Formats the code blocks of every file in `paths`.
///
/// Progress lines go to `out`; block errors and files that cannot be read
/// or written go to `err`.
/// Fails only on invalid options or when the report streams cannot be
/// written; per-file problems are counted in the report.
pub fn rewrite(
    paths: &[PathBuf],
    options: &RewriteOptions,
    formatter: &dyn SourceFormatter,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<RewriteReport> {
    options.run.format.validate()?;

    let mut report = RewriteReport::default();
    for path in paths {
        rewrite_file(path, options, formatter, &mut report, out, err)?;
    }

    tracing::debug!(
        "{} files, {} rewritten, {} errors",
        paths.len(),
        report.rewritten.len(),
        report.errors
    );
    Ok(report)
}

fn rewrite_file(
    path: &Path,
    options: &RewriteOptions,
    formatter: &dyn SourceFormatter,
    report: &mut RewriteReport,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Skipping {}: {}", path.display(), e);
            writeln!(err, "{}: cannot read file: {}", path.display(), e)?;
            report.errors += 1;
            return Ok(());
        }
    };

    let result = run(&text, &options.run, formatter)?;
    tracing::debug!(
        "{}: {} blocks, {} formatted",
        path.display(),
        result.blocks_seen,
        result.blocks_formatted
    );

    for error in result.errors {
        writeln!(err, "{}", error.with_filename(path))?;
        report.errors += 1;
    }

    if result.modified {
        if options.check {
            writeln!(out, "{}: Would rewrite", path.display())?;
        } else if let Err(e) = fs::write(path, &result.text) {
            tracing::warn!("Could not rewrite {}: {}", path.display(), e);
            writeln!(err, "{}: cannot write file: {}", path.display(), e)?;
            report.errors += 1;
            return Ok(());
        } else {
            tracing::info!("Rewrote {}", path.display());
            writeln!(out, "{}: Rewriting...", path.display())?;
        }
        report.rewritten.push(path.to_path_buf());
    }

    Ok(())
}
