//! # Domain Invariants
//!
//! Post-conditions that MUST hold for every conversion. They are checked
//! unconditionally, in release builds too. A violation fails the conversion
//! of that one code blob and is never cached.
//!
//! - Gain consistency: traced selection adds up to the optimal gain
//! - No overlap: selected intervals are pairwise disjoint
//! - Block boundaries: no JUMPDEST inside a superinstruction
//! - Length preservation: jump targets keep their absolute offsets

use crate::domain::entities::Occurrence;
use crate::errors::ConversionError;
use crate::evm::opcodes::is_block_boundary;

/// Gain consistency: the traced-back selection sums to the DP optimum.
///
/// # Errors
///
/// [`ConversionError::GainMismatch`] if the sums differ.
pub fn check_gain_invariant(
    selected: &[Occurrence],
    optimal: usize,
) -> Result<(), ConversionError> {
    let recovered: usize = selected.iter().map(Occurrence::gain).sum();
    if recovered == optimal {
        Ok(())
    } else {
        Err(ConversionError::GainMismatch { recovered, optimal })
    }
}

/// No overlap: `selected` (sorted by end) satisfies `a.end <= b.start` for
/// every adjacent pair.
///
/// # Errors
///
/// [`ConversionError::OverlappingSchedule`] naming the first offending pair.
pub fn check_no_overlap_invariant(selected: &[Occurrence]) -> Result<(), ConversionError> {
    match selected.windows(2).find(|pair| pair[0].end > pair[1].start) {
        None => Ok(()),
        Some(pair) => Err(ConversionError::OverlappingSchedule {
            first_start: pair[0].start,
            first_end: pair[0].end,
            second_start: pair[1].start,
            second_end: pair[1].end,
        }),
    }
}

/// Block boundaries: no selected interval has a JUMPDEST past its first
/// position. A JUMPDEST at the first position is fine; the jump lands on the
/// symbol.
///
/// # Errors
///
/// [`ConversionError::BlockBoundaryInSuperinstruction`] at the first JUMPDEST
/// found inside an interval.
pub fn check_block_boundary_invariant(
    opcodes: &[u8],
    selected: &[Occurrence],
) -> Result<(), ConversionError> {
    for occ in selected {
        let interior = opcodes.get(occ.start + 1..occ.end).unwrap_or_default();
        if let Some(offset) = interior.iter().position(|&op| is_block_boundary(op)) {
            return Err(ConversionError::BlockBoundaryInSuperinstruction {
                symbol: occ.symbol,
                position: occ.start + 1 + offset,
            });
        }
    }
    Ok(())
}

/// Length preservation: converted code is exactly as long as the original.
///
/// # Errors
///
/// [`ConversionError::LengthMismatch`] if the lengths differ.
pub fn check_length_invariant(before: usize, after: usize) -> Result<(), ConversionError> {
    if before == after {
        Ok(())
    } else {
        Err(ConversionError::LengthMismatch { before, after })
    }
}

// =============================================================================
// TESTS
// =============================================================================
