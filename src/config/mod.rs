//! Configuration loading and management.

mod config_data;
mod config_update;

use std::fs;
use std::path::{Path, PathBuf};

pub use config_data::Config;
pub use config_update::ConfigUpdate;

use crate::errors::{BlackenError, Result};

/// Standard configuration file names to search for.
pub const CONFIG_FILES: &[&str] = &["blacken-docs.toml", ".blacken-docs.toml"];

/// Finds the configuration file in the given directory or its parents.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for name in CONFIG_FILES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Reads configuration from a TOML file.
pub fn read_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| BlackenError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let update: ConfigUpdate = toml::from_str(&content)?;
    let config = update.merge_into(&Config::default());
    tracing::debug!("Read configuration from {}", path.display());
    Ok(config)
}

/// Reads configuration, searching from the given directory.
///
/// If no config file is found, returns the default configuration.
pub fn read_config(start_dir: &Path) -> Result<Config> {
    match find_config_file(start_dir) {
        Some(path) => read_config_file(&path),
        None => Ok(Config::default()),
    }
}
