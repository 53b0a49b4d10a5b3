//! # Static Pattern Source
//!
//! Dictionary compiled into the binary. Also the usual source in tests.

use crate::domain::value_objects::Symbol;
use crate::errors::ConfigError;
use crate::optimizer::dictionary::PatternDictionary;
use crate::ports::outbound::PatternSource;

#[derive(Clone, Debug)]
enum Entries {
    /// Numbered from 256 in order.
    Sequence(Vec<Vec<u8>>),
    Explicit(Vec<(Symbol, Vec<u8>)>),
}

/// In-memory pattern list.
#[derive(Clone, Debug)]
pub struct StaticPatternSource {
    entries: Entries,
}

impl StaticPatternSource {
    /// Patterns with explicit symbols.
    #[must_use]
    pub fn new(entries: Vec<(Symbol, Vec<u8>)>) -> Self {
        Self {
            entries: Entries::Explicit(entries),
        }
    }

    /// Patterns numbered consecutively from 256.
    #[must_use]
    pub fn sequential(patterns: Vec<Vec<u8>>) -> Self {
        Self {
            entries: Entries::Sequence(patterns),
        }
    }

    /// Frequent sequences in solc output: prologue, selector dispatch,
    /// stack shuffles and branch tails.
    #[must_use]
    pub fn evm_common() -> Self {
        Self::sequential(vec![
            // PUSH1 0x80 PUSH1 0x40 MSTORE
            vec![0x60, 0x60, 0x52],
            // CALLVALUE DUP1 ISZERO
            vec![0x34, 0x80, 0x15],
            // PUSH1 0x04 CALLDATASIZE LT
            vec![0x60, 0x36, 0x10],
            // CALLDATALOAD PUSH1 0xe0 SHR
            vec![0x35, 0x60, 0x1C],
            // DUP1 PUSH4 <selector> EQ PUSH2 <dest> JUMPI
            vec![0x80, 0x63, 0x14, 0x61, 0x57],
            // ISZERO PUSH2 JUMPI
            vec![0x15, 0x61, 0x57],
            // PUSH2 JUMPI
            vec![0x61, 0x57],
            // PUSH2 JUMP
            vec![0x61, 0x56],
            // PUSH1 0x00 DUP1 REVERT
            vec![0x60, 0x80, 0xFD],
            // JUMPDEST POP
            vec![0x5B, 0x50],
            // JUMPDEST PUSH1 DUP1
            vec![0x5B, 0x60, 0x80],
            // SWAP1 POP
            vec![0x90, 0x50],
            // SWAP2 SWAP1 POP
            vec![0x91, 0x90, 0x50],
            // SWAP1 JUMP
            vec![0x90, 0x56],
            // POP POP
            vec![0x50, 0x50],
            // DUP2 DUP2
            vec![0x81, 0x81],
            // DUP1 MLOAD
            vec![0x80, 0x51],
            // PUSH1 ADD
            vec![0x60, 0x01],
        ])
    }
}

impl PatternSource for StaticPatternSource {
    fn load_patterns(&self) -> Result<PatternDictionary, ConfigError> {
        match &self.entries {
            Entries::Sequence(patterns) => {
                PatternDictionary::from_sequence(patterns.iter().cloned())
            }
            Entries::Explicit(entries) => {
                let mut dict = PatternDictionary::new();
                for (symbol, pattern) in entries {
                    dict.insert(*symbol, pattern.clone())?;
                }
                Ok(dict)
            }
        }
    }
}
