//! Python target versions.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BlackenError;

/// A Python release the formatted code must stay compatible with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum TargetVersion {
    Py27,
    Py33,
    Py34,
    Py35,
    Py36,
    Py37,
    Py38,
    Py39,
    Py310,
    Py311,
    Py312,
    Py313,
}

impl TargetVersion {
    /// All known versions, oldest first.
    pub const ALL: [TargetVersion; 12] = [
        TargetVersion::Py27,
        TargetVersion::Py33,
        TargetVersion::Py34,
        TargetVersion::Py35,
        TargetVersion::Py36,
        TargetVersion::Py37,
        TargetVersion::Py38,
        TargetVersion::Py39,
        TargetVersion::Py310,
        TargetVersion::Py311,
        TargetVersion::Py312,
        TargetVersion::Py313,
    ];

    /// Returns the flag spelling, e.g. `py36`.
    pub fn name(&self) -> &'static str {
        match self {
            TargetVersion::Py27 => "py27",
            TargetVersion::Py33 => "py33",
            TargetVersion::Py34 => "py34",
            TargetVersion::Py35 => "py35",
            TargetVersion::Py36 => "py36",
            TargetVersion::Py37 => "py37",
            TargetVersion::Py38 => "py38",
            TargetVersion::Py39 => "py39",
            TargetVersion::Py310 => "py310",
            TargetVersion::Py311 => "py311",
            TargetVersion::Py312 => "py312",
            TargetVersion::Py313 => "py313",
        }
    }

    pub fn is_python2(&self) -> bool {
        matches!(self, TargetVersion::Py27)
    }
}

/// Rejects target sets no source file could ever satisfy.
pub fn validate_targets(targets: &BTreeSet<TargetVersion>) -> Result<(), BlackenError> {
    let has_py2 = targets.iter().any(TargetVersion::is_python2);
    let has_py3 = targets.iter().any(|v| !v.is_python2());
    if has_py2 && has_py3 {
        let names: Vec<&str> = targets.iter().map(TargetVersion::name).collect();
        return Err(BlackenError::IncompatibleTargets(format!(
            "cannot mix Python 2 and Python 3 targets ({})",
            names.join(", ")
        )));
    }
    Ok(())
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TargetVersion {
    type Err = BlackenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TargetVersion::ALL
            .into_iter()
            .find(|v| v.name() == wanted)
            .ok_or_else(|| BlackenError::UnknownTargetVersion(s.to_string()))
    }
}
