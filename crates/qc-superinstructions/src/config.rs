//! Superinstruction configuration from defaults or environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment variable: skip optimization and widen code verbatim.
pub const ENV_IDENTITY_CONVERSION: &str = "QC_SI_IDENTITY_CONVERSION";
/// Environment variable: enable the converted code cache.
pub const ENV_CACHE_ENABLED: &str = "QC_SI_CACHE_ENABLED";
/// Environment variable: JSON dictionary file.
pub const ENV_DICTIONARY_PATH: &str = "QC_SI_DICTIONARY_PATH";

/// Configuration for the superinstruction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperinstructionConfig {
    /// Every byte becomes one wide instruction; no matching, nothing cached
    pub identity_conversion: bool,

    /// Cache converted code by code hash
    pub cache_enabled: bool,

    /// Dictionary file to load instead of the built-in pattern set
    pub dictionary_path: Option<PathBuf>,
}

impl Default for SuperinstructionConfig {
    fn default() -> Self {
        Self {
            identity_conversion: false,
            cache_enabled: true,
            dictionary_path: None,
        }
    }
}

impl SuperinstructionConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_SI_IDENTITY_CONVERSION`: Identity conversion (default: false)
    /// - `QC_SI_CACHE_ENABLED`: Cache converted code (default: true)
    /// - `QC_SI_DICTIONARY_PATH`: JSON dictionary file (default: built-in set)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            identity_conversion: lookup(ENV_IDENTITY_CONVERSION)
                .map_or(defaults.identity_conversion, |v| {
                    v.to_lowercase() == "true" || v == "1"
                }),

            cache_enabled: lookup(ENV_CACHE_ENABLED)
                .map_or(defaults.cache_enabled, |v| {
                    v.to_lowercase() != "false" && v != "0"
                }),

            dictionary_path: lookup(ENV_DICTIONARY_PATH)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or(defaults.dictionary_path),
        }
    }

    /// Configuration that widens code without optimizing it.
    pub fn identity() -> Self {
        Self {
            identity_conversion: true,
            ..Self::default()
        }
    }
}
