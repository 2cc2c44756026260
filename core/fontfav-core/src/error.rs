//! Typed errors for settings and export persistence (made by FontLab https://www.fontlab.com/)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A settings value that could not be understood. Always recovered by
/// falling back to the default for that key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsParseError {
    #[error("[{section}] {key}: expected two comma-separated integers, got {value:?}")]
    MalformedPair {
        section: String,
        key: String,
        value: String,
    },
}

/// Writing the settings file or an export file failed.
#[derive(Debug, Error)]
#[error("could not write {}: {source}", .path.display())]
pub struct SaveError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl SaveError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
