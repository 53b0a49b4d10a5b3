//! # Value Objects
//!
//! Immutable primitives of the conversion pipeline: the code identity used as
//! cache key, the wide instruction alphabet, and the two code views handed back
//! to the interpreter.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CODE IDENTITY (32 bytes)
// =============================================================================

/// A 32-byte content identity of a code blob (Keccak-256 of the code).
///
/// [`Hash::ZERO`] is reserved: codes presented under it are never cached.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The zero hash (the "do not cache" identity).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a hash from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true if this is the zero hash.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}...{}",
            hex::encode(&self.0[..4]),
            hex::encode(&self.0[28..])
        )
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// SYMBOLS & WIDE OPCODES
// =============================================================================

/// Superinstruction symbol. Valid symbols lie in `FIRST_SYMBOL..=LAST_SYMBOL`.
pub type Symbol = u16;

/// First symbol value; everything below is a raw byte opcode.
pub const FIRST_SYMBOL: Symbol = 256;

/// Last usable symbol value; `0xFFFF` is the NOP placeholder.
pub const LAST_SYMBOL: Symbol = 0xFFFE;

/// One entry of the wide instruction stream.
///
/// Holds a raw opcode (or PUSH immediate byte), a superinstruction symbol, or
/// the NOP placeholder that pads the interior of a superinstruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WideOpcode(pub u16);

impl WideOpcode {
    /// Value returned for reads past the end of the code (same as EVM `STOP`).
    pub const STOP: Self = Self(0);

    /// Placeholder occupying the positions covered by a superinstruction.
    pub const NOP: Self = Self(0xFFFF);

    /// Widens a raw byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte as u16)
    }

    /// Wraps a superinstruction symbol.
    #[must_use]
    pub const fn from_symbol(symbol: Symbol) -> Self {
        Self(symbol)
    }

    /// Returns the byte if this entry is a raw opcode or immediate.
    #[must_use]
    pub fn as_byte(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }

    /// Returns true if this entry is a superinstruction symbol.
    #[must_use]
    pub const fn is_symbol(self) -> bool {
        self.0 >= FIRST_SYMBOL && self.0 <= LAST_SYMBOL
    }

    /// Returns true if this entry is the NOP placeholder.
    #[must_use]
    pub const fn is_nop(self) -> bool {
        self.0 == Self::NOP.0
    }
}

impl fmt::Debug for WideOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nop() {
            write!(f, "NOP")
        } else if self.is_symbol() {
            write!(f, "SI#{}", self.0)
        } else {
            write!(f, "0x{:02x}", self.0)
        }
    }
}

impl From<u8> for WideOpcode {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

// =============================================================================
// CODE VIEWS
// =============================================================================

/// Converted code: one wide instruction per byte of the original code.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WideCode(pub Vec<WideOpcode>);

impl WideCode {
    /// Widens every byte verbatim (no superinstructions).
    #[must_use]
    pub fn widen(code: &[u8]) -> Self {
        Self(code.iter().copied().map(WideOpcode::from_byte).collect())
    }

    /// Instruction at position `n`, or [`WideOpcode::STOP`] past the end.
    #[must_use]
    pub fn get_op(&self, n: usize) -> WideOpcode {
        self.0.get(n).copied().unwrap_or(WideOpcode::STOP)
    }

    /// Number of wide instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the instructions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[WideOpcode] {
        &self.0
    }

    /// Number of superinstruction symbols in the stream.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.0.iter().filter(|op| op.is_symbol()).count()
    }
}

impl fmt::Debug for WideCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<Vec<WideOpcode>> for WideCode {
    fn from(ops: Vec<WideOpcode>) -> Self {
        Self(ops)
    }
}

/// The original byte code, kept next to its converted form.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InterpreterCode(pub Vec<u8>);

impl InterpreterCode {
    /// Byte at position `n`, or `0x00` (`STOP`) past the end.
    #[must_use]
    pub fn get_op(&self, n: usize) -> u8 {
        self.0.get(n).copied().unwrap_or(0)
    }

    /// Code length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the code is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for InterpreterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() <= 32 {
            write!(f, "0x{}", hex::encode(&self.0))
        } else {
            write!(f, "0x{}...({} bytes)", hex::encode(&self.0[..32]), self.0.len())
        }
    }
}

impl From<&[u8]> for InterpreterCode {
    fn from(code: &[u8]) -> Self {
        Self(code.to_vec())
    }
}

// =============================================================================
// TESTS
// =============================================================================
