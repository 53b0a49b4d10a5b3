//! # Driven Port (SPI - Outbound)
//!
//! Where the superinstruction dictionary comes from.

use crate::errors::ConfigError;
use crate::optimizer::dictionary::PatternDictionary;

/// Supplies the symbol → pattern table.
///
/// Consulted exactly once per service initialization.
pub trait PatternSource: Send + Sync {
    /// Load and return the dictionary.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] raised while reading or validating entries.
    fn load_patterns(&self) -> Result<PatternDictionary, ConfigError>;
}
