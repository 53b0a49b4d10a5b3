//! # EVM Opcode Facts
//!
//! The few opcode properties the converter depends on: the PUSH range with
//! its immediate lengths, and the basic-block boundary marker.

use std::ops::RangeInclusive;

/// Halts execution; also the value read past the end of the code.
pub const STOP: u8 = 0x00;

/// Valid jump target; starts a basic block.
pub const JUMPDEST: u8 = 0x5B;

/// `PUSH1`, pushes one immediate byte.
pub const PUSH1: u8 = 0x60;

/// `PUSH32`, pushes thirty-two immediate bytes.
pub const PUSH32: u8 = 0x7F;

/// Contiguous range of push-with-immediate opcodes.
pub const PUSH_RANGE: RangeInclusive<u8> = PUSH1..=PUSH32;

/// Number of immediate data bytes following `opcode` (0 for non-PUSH).
///
/// `PUSH0` (0x5F) carries no immediate and maps to 0 like any other opcode.
#[must_use]
pub const fn immediate_len(opcode: u8) -> usize {
    if opcode >= PUSH1 && opcode <= PUSH32 {
        (opcode - PUSH1) as usize + 1
    } else {
        0
    }
}

/// Returns true for opcodes that carry immediate data.
#[must_use]
pub const fn is_push_with_immediate(opcode: u8) -> bool {
    immediate_len(opcode) > 0
}

/// Returns true for opcodes that may be the target of a jump.
#[must_use]
pub const fn is_block_boundary(opcode: u8) -> bool {
    opcode == JUMPDEST
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_len() {
        assert_eq!(immediate_len(0x5F), 0); // PUSH0
        assert_eq!(immediate_len(PUSH1), 1);
        assert_eq!(immediate_len(0x61), 2); // PUSH2
        assert_eq!(immediate_len(PUSH32), 32);
        assert_eq!(immediate_len(0x80), 0); // DUP1
        assert_eq!(immediate_len(STOP), 0);
    }

    #[test]
    fn test_push_range_is_contiguous() {
        assert_eq!(PUSH_RANGE.count(), 32);
        for (i, op) in PUSH_RANGE.enumerate() {
            assert_eq!(immediate_len(op), i + 1);
            assert!(is_push_with_immediate(op));
        }
    }

    #[test]
    fn test_block_boundary() {
        assert!(is_block_boundary(JUMPDEST));
        assert!(!is_block_boundary(0x56)); // JUMP
    }
}
