//! # Domain Entities
//!
//! Results flowing through the conversion pipeline: matched occurrences, the
//! selected schedule, and the final cache entry.

use crate::domain::value_objects::{InterpreterCode, Symbol, WideCode};
use serde::{Deserialize, Serialize};

// =============================================================================
// OCCURRENCE
// =============================================================================

/// A pattern match in the opcode view: half-open interval `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    /// Symbol of the matched pattern.
    pub symbol: Symbol,
    /// First opcode-view position covered.
    pub start: usize,
    /// One past the last opcode-view position covered.
    pub end: usize,
}

impl Occurrence {
    /// Create a new occurrence.
    #[must_use]
    pub const fn new(symbol: Symbol, start: usize, end: usize) -> Self {
        Self { symbol, start, end }
    }

    /// Number of opcodes covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for a zero-width interval.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Dispatches saved by collapsing this occurrence: `end - start - 1`.
    #[must_use]
    pub const fn gain(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Returns true if the two half-open intervals share a position.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// =============================================================================
// SCHEDULE
// =============================================================================

/// Conflict-free subset of occurrences with maximum total gain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Selected occurrences, sorted by position.
    pub selected: Vec<Occurrence>,
    /// Sum of the gains of `selected`.
    pub total_gain: usize,
}

impl Schedule {
    /// Number of superinstructions in the schedule.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

// =============================================================================
// CONVERTED CODE (cache entry)
// =============================================================================

/// Result of converting one code blob. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedCode {
    /// Wide instruction stream, same length as `interpreter_code`.
    pub code: WideCode,
    /// Copy of the original bytes.
    pub interpreter_code: InterpreterCode,
    /// Estimated dispatch speedup (`1.0` means none).
    pub estimated_speedup: f64,
    /// Superinstructions emitted.
    pub superinstructions: usize,
    /// Dispatches saved over one straight-line pass.
    pub dispatches_saved: usize,
}

impl ConvertedCode {
    /// Identity conversion: every byte widened, no superinstructions.
    #[must_use]
    pub fn identity(code: &[u8]) -> Self {
        Self {
            code: WideCode::widen(code),
            interpreter_code: InterpreterCode::from(code),
            estimated_speedup: 1.0,
            superinstructions: 0,
            dispatches_saved: 0,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::WideOpcode;

    #[test]
    fn test_occurrence_gain() {
        assert_eq!(Occurrence::new(300, 0, 3).gain(), 2);
        assert_eq!(Occurrence::new(300, 4, 5).gain(), 0);
        assert_eq!(Occurrence::new(0, 0, 0).gain(), 0);
    }

    #[test]
    fn test_occurrence_overlap_is_half_open() {
        let a = Occurrence::new(300, 0, 3);
        let b = Occurrence::new(301, 3, 5);
        let c = Occurrence::new(302, 1, 4);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_identity_conversion_entry() {
        let entry = ConvertedCode::identity(&[0x60, 0x80]);
        assert_eq!(entry.code.len(), 2);
        assert_eq!(entry.code.get_op(0), WideOpcode(0x60));
        assert_eq!(entry.interpreter_code.get_op(1), 0x80);
        assert!((entry.estimated_speedup - 1.0).abs() < f64::EPSILON);
    }
}
