//! Configuration update and merging.

use serde::{Deserialize, Serialize};

use super::config_data::Config;
use crate::formatter::TargetVersion;

/// Partial configuration update that can be merged into a Config.
///
/// All fields are optional. Only specified fields override the base config.
/// Config files and command-line flags are both read into this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub line_length: Option<usize>,

    #[serde(default)]
    pub target_versions: Option<Vec<TargetVersion>>,

    #[serde(default)]
    pub skip_string_normalization: Option<bool>,

    #[serde(default)]
    pub skip_errors: Option<bool>,

    #[serde(default)]
    pub languages: Option<Vec<String>>,

    #[serde(default)]
    pub formatter_command: Option<Vec<String>>,
}

impl ConfigUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges this update into a base configuration, returning a new Config.
    ///
    /// Consumes `self` so fields can be moved instead of cloned.
    pub fn merge_into(self, base: &Config) -> Config {
        Config {
            line_length: self.line_length.unwrap_or(base.line_length),
            target_versions: self
                .target_versions
                .unwrap_or_else(|| base.target_versions.clone()),
            skip_string_normalization: self
                .skip_string_normalization
                .unwrap_or(base.skip_string_normalization),
            skip_errors: self.skip_errors.unwrap_or(base.skip_errors),
            languages: self.languages.unwrap_or_else(|| base.languages.clone()),
            formatter_command: self
                .formatter_command
                .unwrap_or_else(|| base.formatter_command.clone()),
        }
    }
}

impl From<ConfigUpdate> for Config {
    fn from(update: ConfigUpdate) -> Self {
        update.merge_into(&Config::default())
    }
}
