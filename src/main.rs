//! blacken-docs-jb CLI - run black on Python code blocks in documentation

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use blacken_docs_jb::config::{self, Config, ConfigUpdate};
use blacken_docs_jb::formatter::TargetVersion;
use blacken_docs_jb::{commands, Result};

#[derive(Parser)]
#[command(name = "blacken-docs-jb")]
#[command(
    author,
    version,
    about = "Run black on Python code blocks in Markdown and MyST documents",
    long_about = None
)]
struct Cli {
    /// Documents to format in place
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// How many characters per line to allow
    #[arg(short, long)]
    line_length: Option<usize>,

    /// Python versions that should be supported (repeatable)
    #[arg(short = 't', long = "target-version", value_enum)]
    target_versions: Vec<TargetVersion>,

    /// Don't normalize string quotes or prefixes
    #[arg(short = 'S', long)]
    skip_string_normalization: bool,

    /// Don't fail because of code blocks that could not be formatted
    #[arg(short = 'E', long)]
    skip_errors: bool,

    /// Report files that would be rewritten, without writing them
    #[arg(long)]
    check: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Formatter command line, e.g. "python -m black". Split on whitespace
    /// without shell quoting; set `formatter_command` in the config file for
    /// paths that contain spaces
    #[arg(long, value_name = "COMMAND")]
    formatter: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags given on the command line, as an update over the file config.
    fn config_update(&self) -> ConfigUpdate {
        ConfigUpdate {
            line_length: self.line_length,
            target_versions: (!self.target_versions.is_empty())
                .then(|| self.target_versions.clone()),
            skip_string_normalization: self.skip_string_normalization.then_some(true),
            skip_errors: self.skip_errors.then_some(true),
            languages: None,
            formatter_command: self
                .formatter
                .as_ref()
                .map(|cmd| cmd.split_whitespace().map(str::to_string).collect()),
        }
    }

    fn load_config(&self) -> Result<Config> {
        let base = match &self.config {
            Some(path) => config::read_config_file(path)?,
            None => config::read_config(&std::env::current_dir()?)?,
        };
        Ok(self.config_update().merge_into(&base))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = commands::RewriteOptions {
        run: config.run_options(),
        check: cli.check,
    };
    let formatter = config.formatter();

    let result = commands::rewrite(
        &cli.files,
        &options,
        &formatter,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );

    match result {
        Ok(report) if report.exit_failure(config.skip_errors) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
