//! # Pattern Dictionary
//!
//! Symbol → opcode sequence table the automaton is built from.
//!
//! ## Symbol Numbering
//!
//! Symbols start at 256 so they never collide with byte opcodes in the wide
//! instruction alphabet. `0xFFFF` is reserved for the NOP placeholder.
//! [`PatternDictionary::from_sequence`] numbers patterns consecutively from
//! 256 in the order supplied.
//!
//! ## File Format
//!
//! ```json
//! { "superinstructions": [ { "symbol": 256, "pattern": "0x6060" } ] }
//! ```

use crate::domain::value_objects::{Symbol, FIRST_SYMBOL, LAST_SYMBOL};
use crate::errors::ConfigError;
use crate::evm::opcodes::is_block_boundary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Validated symbol → pattern table. Immutable once handed to the automaton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternDictionary {
    entries: BTreeMap<Symbol, Vec<u8>>,
    by_pattern: HashMap<Vec<u8>, Symbol>,
}

/// One entry of a dictionary file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Superinstruction symbol.
    pub symbol: Symbol,
    /// Hex-encoded opcode sequence, optional `0x` prefix.
    pub pattern: String,
}

/// On-disk dictionary layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DictionaryFile {
    /// All entries.
    pub superinstructions: Vec<DictionaryEntry>,
}

impl PatternDictionary {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary numbering `patterns` from 256 in order.
    ///
    /// # Errors
    ///
    /// Any rejection from [`insert`](Self::insert), or
    /// [`ConfigError::SymbolOutOfRange`] once the symbol space is exhausted.
    pub fn from_sequence<I>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut dict = Self::new();
        let mut next = u32::from(FIRST_SYMBOL);
        for pattern in patterns {
            let symbol = Symbol::try_from(next)
                .ok()
                .filter(|s| *s <= LAST_SYMBOL)
                .ok_or(ConfigError::SymbolOutOfRange { symbol: 0xFFFF })?;
            dict.insert(symbol, pattern)?;
            next += 1;
        }
        Ok(dict)
    }

    /// Parse a JSON dictionary (see module docs for the layout).
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDictionary`] for malformed JSON or hex, and any
    /// rejection from [`insert`](Self::insert).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: DictionaryFile = serde_json::from_str(json)
            .map_err(|e| ConfigError::InvalidDictionary(e.to_string()))?;

        let mut dict = Self::new();
        for entry in file.superinstructions {
            let digits = entry
                .pattern
                .strip_prefix("0x")
                .unwrap_or(&entry.pattern);
            let pattern = hex::decode(digits).map_err(|e| {
                ConfigError::InvalidDictionary(format!("symbol {}: {e}", entry.symbol))
            })?;
            dict.insert(entry.symbol, pattern)?;
        }
        Ok(dict)
    }

    /// Serialize to the JSON file layout.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDictionary`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let file = DictionaryFile {
            superinstructions: self
                .iter()
                .map(|(symbol, pattern)| DictionaryEntry {
                    symbol,
                    pattern: format!("0x{}", hex::encode(pattern)),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&file)
            .map_err(|e| ConfigError::InvalidDictionary(e.to_string()))
    }

    /// Add one pattern.
    ///
    /// # Errors
    ///
    /// Rejects symbols outside `256..=0xFFFE`, empty patterns, reused symbols,
    /// byte sequences already assigned to another symbol, and patterns with a
    /// JUMPDEST past their first byte.
    pub fn insert(&mut self, symbol: Symbol, pattern: Vec<u8>) -> Result<(), ConfigError> {
        if !(FIRST_SYMBOL..=LAST_SYMBOL).contains(&symbol) {
            return Err(ConfigError::SymbolOutOfRange { symbol });
        }
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern { symbol });
        }
        if self.entries.contains_key(&symbol) {
            return Err(ConfigError::DuplicateSymbol { symbol });
        }
        if let Some(&first) = self.by_pattern.get(&pattern) {
            return Err(ConfigError::DuplicatePattern {
                first,
                second: symbol,
            });
        }
        if let Some(offset) = pattern
            .iter()
            .skip(1)
            .position(|&op| is_block_boundary(op))
        {
            return Err(ConfigError::BlockBoundaryInPattern {
                symbol,
                offset: offset + 1,
            });
        }

        self.by_pattern.insert(pattern.clone(), symbol);
        self.entries.insert(symbol, pattern);
        Ok(())
    }

    /// Pattern for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: Symbol) -> Option<&[u8]> {
        self.entries.get(&symbol).map(Vec::as_slice)
    }

    /// Symbol assigned to `pattern`.
    #[must_use]
    pub fn symbol_of(&self, pattern: &[u8]) -> Option<Symbol> {
        self.by_pattern.get(pattern).copied()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[u8])> + '_ {
        self.entries.iter().map(|(&s, p)| (s, p.as_slice()))
    }

    /// Number of superinstructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no patterns were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest pattern.
    #[must_use]
    pub fn max_pattern_len(&self) -> usize {
        self.entries.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Checks the dictionary is usable for conversion.
    ///
    /// Per-entry rules are enforced on insert; this adds the whole-table rule
    /// that at least one pattern exists.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyDictionary`] for an empty table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::EmptyDictionary);
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evm::opcodes::JUMPDEST;

    #[test]
    fn test_from_sequence_numbers_from_256() {
        let dict =
            PatternDictionary::from_sequence(vec![vec![0x60, 0x60], vec![0x80, 0x91]]).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(256), Some(&[0x60, 0x60][..]));
        assert_eq!(dict.get(257), Some(&[0x80, 0x91][..]));
        assert_eq!(dict.symbol_of(&[0x80, 0x91]), Some(257));
        assert_eq!(dict.max_pattern_len(), 2);
    }

    #[test]
    fn test_rejects_symbol_in_byte_range() {
        let mut dict = PatternDictionary::new();
        assert_eq!(
            dict.insert(255, vec![0x01]),
            Err(ConfigError::SymbolOutOfRange { symbol: 255 })
        );
        assert_eq!(
            dict.insert(0xFFFF, vec![0x01]),
            Err(ConfigError::SymbolOutOfRange { symbol: 0xFFFF })
        );
    }

    #[test]
    fn test_rejects_empty_pattern() {
        let mut dict = PatternDictionary::new();
        assert_eq!(
            dict.insert(256, vec![]),
            Err(ConfigError::EmptyPattern { symbol: 256 })
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut dict = PatternDictionary::new();
        dict.insert(256, vec![0x01, 0x02]).unwrap();
        assert_eq!(
            dict.insert(256, vec![0x03]),
            Err(ConfigError::DuplicateSymbol { symbol: 256 })
        );
        assert_eq!(
            dict.insert(300, vec![0x01, 0x02]),
            Err(ConfigError::DuplicatePattern {
                first: 256,
                second: 300
            })
        );
    }

    #[test]
    fn test_jumpdest_only_allowed_first() {
        let mut dict = PatternDictionary::new();
        assert!(dict.insert(256, vec![JUMPDEST, 0x60, 0x01]).is_ok());
        assert_eq!(
            dict.insert(257, vec![0x60, JUMPDEST]),
            Err(ConfigError::BlockBoundaryInPattern {
                symbol: 257,
                offset: 1
            })
        );
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(
            PatternDictionary::new().validate(),
            Err(ConfigError::EmptyDictionary)
        );
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{ "superinstructions": [
            { "symbol": 300, "pattern": "0x6060" },
            { "symbol": 301, "pattern": "8091" }
        ] }"#;
        let dict = PatternDictionary::from_json(json).unwrap();
        assert_eq!(dict.get(300), Some(&[0x60, 0x60][..]));
        assert_eq!(dict.get(301), Some(&[0x80, 0x91][..]));

        let reparsed = PatternDictionary::from_json(&dict.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, dict);
    }

    #[test]
    fn test_json_bad_hex() {
        let json = r#"{ "superinstructions": [ { "symbol": 300, "pattern": "zz" } ] }"#;
        assert!(matches!(
            PatternDictionary::from_json(json),
            Err(ConfigError::InvalidDictionary(_))
        ));
    }
}
