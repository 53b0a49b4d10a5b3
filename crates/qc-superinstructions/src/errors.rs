//! # Error Types
//!
//! All error types for superinstruction conversion.

use crate::domain::value_objects::Symbol;
use thiserror::Error;

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

/// Errors in the pattern dictionary or its source, raised at initialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Dictionary holds no patterns.
    #[error("pattern dictionary is empty")]
    EmptyDictionary,

    /// A pattern has no bytes.
    #[error("empty pattern for symbol {symbol}")]
    EmptyPattern { symbol: Symbol },

    /// Symbol collides with the raw opcode range or the NOP placeholder.
    #[error("symbol {symbol} out of range 256..=65534")]
    SymbolOutOfRange { symbol: Symbol },

    /// The same symbol was assigned twice.
    #[error("duplicate symbol {symbol}")]
    DuplicateSymbol { symbol: Symbol },

    /// Two symbols share the same byte sequence.
    #[error("symbols {first} and {second} have identical patterns")]
    DuplicatePattern { first: Symbol, second: Symbol },

    /// Pattern would swallow a JUMPDEST into the interior of a superinstruction.
    #[error("pattern for symbol {symbol} has JUMPDEST at offset {offset}")]
    BlockBoundaryInPattern { symbol: Symbol, offset: usize },

    /// Dictionary file could not be parsed.
    #[error("invalid dictionary: {0}")]
    InvalidDictionary(String),

    /// Dictionary file could not be read.
    #[error("dictionary I/O error: {0}")]
    Io(String),
}

// =============================================================================
// CONVERSION ERRORS
// =============================================================================

/// Internal consistency violations during conversion.
///
/// These indicate a defect in the automaton/scheduler/rewriter coupling, not
/// bad input. The conversion is deterministic, so retrying reproduces the
/// failure; the failed result is never cached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Traced-back selection does not add up to the optimal gain.
    #[error("schedule gain mismatch: recovered {recovered}, optimal {optimal}")]
    GainMismatch { recovered: usize, optimal: usize },

    /// Two selected superinstructions overlap.
    #[error(
        "overlapping superinstructions: [{first_start}, {first_end}) [{second_start}, {second_end})"
    )]
    OverlappingSchedule {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    /// A scheduled interval does not start at the rewriter's scan position.
    #[error("schedule start {start} does not match scan position {position}")]
    MisalignedSchedule { start: usize, position: usize },

    /// A scheduled interval covers no opcode.
    #[error("empty interval [{start}, {end}) for superinstruction {symbol}")]
    EmptyInterval {
        symbol: Symbol,
        start: usize,
        end: usize,
    },

    /// A scheduled interval runs past the opcode view.
    #[error("schedule end {end} exceeds opcode count {len}")]
    ScheduleOutOfBounds { end: usize, len: usize },

    /// Rewritten code length differs from the original.
    #[error("length mismatch after conversion: {after} vs. before: {before}")]
    LengthMismatch { before: usize, after: usize },

    /// A JUMPDEST would land on a NOP placeholder.
    #[error("JUMPDEST at opcode {position} inside superinstruction {symbol}")]
    BlockBoundaryInSuperinstruction { symbol: Symbol, position: usize },
}

impl ConversionError {
    /// Returns true if this error was raised by a scheduler post-condition.
    #[must_use]
    pub fn is_scheduler_defect(&self) -> bool {
        matches!(
            self,
            Self::GainMismatch { .. } | Self::OverlappingSchedule { .. }
        )
    }
}

// =============================================================================
// SUBSYSTEM ERROR
// =============================================================================

/// Any error surfaced by the superinstruction service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuperinstructionError {
    /// Initialization rejected the configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A conversion failed an internal invariant.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

impl SuperinstructionError {
    /// Returns true for internal consistency violations (as opposed to bad
    /// configuration).
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Conversion(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::SymbolOutOfRange { symbol: 12 };
        assert_eq!(err.to_string(), "symbol 12 out of range 256..=65534");

        let err = ConfigError::DuplicatePattern {
            first: 256,
            second: 300,
        };
        assert_eq!(
            err.to_string(),
            "symbols 256 and 300 have identical patterns"
        );
    }

    #[test]
    fn test_conversion_error_display() {
        let err = ConversionError::LengthMismatch {
            before: 10,
            after: 9,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch after conversion: 9 vs. before: 10"
        );

        let err = ConversionError::OverlappingSchedule {
            first_start: 0,
            first_end: 3,
            second_start: 2,
            second_end: 4,
        };
        assert!(err.to_string().contains("[0, 3) [2, 4)"));
    }

    #[test]
    fn test_scheduler_defect_classification() {
        assert!(ConversionError::GainMismatch {
            recovered: 1,
            optimal: 2
        }
        .is_scheduler_defect());
        assert!(!ConversionError::LengthMismatch {
            before: 1,
            after: 2
        }
        .is_scheduler_defect());
    }

    #[test]
    fn test_error_conversion() {
        let err: SuperinstructionError = ConfigError::EmptyDictionary.into();
        assert!(matches!(err, SuperinstructionError::Config(_)));
        assert!(!err.is_invariant_violation());

        let err: SuperinstructionError = ConversionError::MisalignedSchedule {
            start: 4,
            position: 5,
        }
        .into();
        assert!(matches!(err, SuperinstructionError::Conversion(_)));
        assert!(err.is_invariant_violation());
    }
}
