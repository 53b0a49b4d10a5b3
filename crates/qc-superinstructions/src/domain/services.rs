//! # Domain Services
//!
//! Pure functions shared by the pipeline and its callers.
//! Deterministic, no side effects, no I/O.

use crate::domain::value_objects::Hash;
use sha3::{Digest, Keccak256};

/// Computes the Keccak-256 content identity of a code blob.
///
/// This is the identity the cache is keyed by. The empty code hashes to the
/// well-known `0xc5d2...a470`, never to [`Hash::ZERO`].
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let digest = Keccak256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Hash::new(bytes)
}

/// Estimated dispatch speedup of a conversion.
///
/// `opcodes` is the number of dispatches before conversion (opcode-view
/// length), `gain` the dispatches removed by superinstructions.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimated_speedup(opcodes: usize, gain: usize) -> f64 {
    let remaining = opcodes.saturating_sub(gain);
    if opcodes == 0 || remaining == 0 {
        return 1.0;
    }
    opcodes as f64 / remaining as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256(&[]);
        assert_eq!(
            hex::encode(hash.as_bytes()),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert!(!hash.is_zero());
    }

    #[test]
    fn test_keccak256_differs_by_content() {
        assert_ne!(keccak256(&[0x60, 0x00]), keccak256(&[0x60, 0x01]));
    }

    #[test]
    fn test_estimated_speedup() {
        assert!((estimated_speedup(10, 5) - 2.0).abs() < f64::EPSILON);
        assert!((estimated_speedup(10, 0) - 1.0).abs() < f64::EPSILON);
        assert!((estimated_speedup(0, 0) - 1.0).abs() < f64::EPSILON);
    }
}
