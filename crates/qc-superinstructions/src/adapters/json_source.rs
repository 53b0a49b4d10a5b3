//! # JSON File Pattern Source
//!
//! Reads a dictionary file (see [`PatternDictionary::from_json`]).

use crate::errors::ConfigError;
use crate::optimizer::dictionary::PatternDictionary;
use crate::ports::outbound::PatternSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dictionary stored as JSON on disk.
#[derive(Clone, Debug)]
pub struct JsonPatternSource {
    path: PathBuf,
}

impl JsonPatternSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PatternSource for JsonPatternSource {
    fn load_patterns(&self) -> Result<PatternDictionary, ConfigError> {
        let json = fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), bytes = json.len(), "Read dictionary file");
        PatternDictionary::from_json(&json)
    }
}
