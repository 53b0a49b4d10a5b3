//! # Opcode View
//!
//! Splits raw bytecode into the stream the pattern matcher sees (one entry per
//! instruction) and a side table holding PUSH immediates in their original
//! order. Immediate bytes are data, never opcodes: they must not be matched or
//! collapsed.

use crate::evm::opcodes::immediate_len;

/// Bytecode split into instructions and immediate data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpcodeView {
    /// One byte per instruction, immediates removed.
    pub opcodes: Vec<u8>,
    /// All PUSH immediates, concatenated in code order.
    pub immediates: Vec<u8>,
}

impl OpcodeView {
    /// Single forward pass over `code`.
    ///
    /// A PUSH truncated by the end of the code contributes only the bytes
    /// actually present, so `opcodes.len() + immediates.len() == code.len()`
    /// always holds.
    #[must_use]
    pub fn split(code: &[u8]) -> Self {
        let mut opcodes = Vec::with_capacity(code.len());
        let mut immediates = Vec::new();
        let mut pc = 0;

        while pc < code.len() {
            let op = code[pc];
            opcodes.push(op);
            let data_start = pc + 1;
            let data_end = (data_start + immediate_len(op)).min(code.len());
            immediates.extend_from_slice(&code[data_start..data_end]);
            pc = data_end;
        }

        Self {
            opcodes,
            immediates,
        }
    }

    /// Number of instructions (dispatches before conversion).
    #[must_use]
    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    /// Returns true if the code had no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    /// Total length of the original code.
    #[must_use]
    pub fn code_len(&self) -> usize {
        self.opcodes.len() + self.immediates.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_opcodes() {
        let view = OpcodeView::split(&[0x01, 0x02, 0x50]);
        assert_eq!(view.opcodes, vec![0x01, 0x02, 0x50]);
        assert!(view.immediates.is_empty());
    }

    #[test]
    fn test_split_strips_push_data() {
        // PUSH1 0x80 PUSH1 0x40 MSTORE PUSH2 0x5b5b
        let code = [0x60, 0x80, 0x60, 0x40, 0x52, 0x61, 0x5B, 0x5B];
        let view = OpcodeView::split(&code);
        assert_eq!(view.opcodes, vec![0x60, 0x60, 0x52, 0x61]);
        assert_eq!(view.immediates, vec![0x80, 0x40, 0x5B, 0x5B]);
        assert_eq!(view.code_len(), code.len());
    }

    #[test]
    fn test_split_push_data_that_looks_like_opcodes() {
        // PUSH3 with bytes that are themselves PUSH opcodes
        let code = [0x62, 0x60, 0x60, 0x60, 0x01];
        let view = OpcodeView::split(&code);
        assert_eq!(view.opcodes, vec![0x62, 0x01]);
        assert_eq!(view.immediates, vec![0x60, 0x60, 0x60]);
    }

    #[test]
    fn test_split_truncated_push() {
        // PUSH4 with only two data bytes before end of code
        let code = [0x01, 0x63, 0xAA, 0xBB];
        let view = OpcodeView::split(&code);
        assert_eq!(view.opcodes, vec![0x01, 0x63]);
        assert_eq!(view.immediates, vec![0xAA, 0xBB]);
        assert_eq!(view.code_len(), code.len());
    }

    #[test]
    fn test_split_empty() {
        let view = OpcodeView::split(&[]);
        assert!(view.is_empty());
        assert_eq!(view.code_len(), 0);
    }
}
