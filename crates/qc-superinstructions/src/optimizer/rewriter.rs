//! # Code Rewriter
//!
//! Runs the full conversion for one code blob and rebuilds a wide instruction
//! stream of exactly the original length.
//!
//! ## Layout of a superinstruction `[s, e)`
//!
//! ```text
//! original:  PUSH1 0x80  PUSH1 0x40  MSTORE
//! converted: SI#300 0x80  NOP  0x40   NOP
//! ```
//!
//! The symbol takes the first instruction's slot, every further instruction
//! slot becomes a NOP, and PUSH immediates stay where they were. Jump targets
//! keep their absolute offsets.

use crate::domain::entities::{ConvertedCode, Occurrence, Schedule};
use crate::domain::invariants::{check_block_boundary_invariant, check_length_invariant};
use crate::domain::services::estimated_speedup;
use crate::domain::value_objects::{InterpreterCode, WideCode, WideOpcode};
use crate::errors::ConversionError;
use crate::evm::bytecode::OpcodeView;
use crate::evm::opcodes::immediate_len;
use crate::optimizer::automaton::Automaton;
use crate::optimizer::scheduler::schedule;
use std::sync::Arc;
use tracing::trace;

/// Converts code using a shared, prebuilt automaton. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CodeRewriter {
    automaton: Arc<Automaton>,
}

impl CodeRewriter {
    /// Create a rewriter over `automaton`.
    #[must_use]
    pub fn new(automaton: Arc<Automaton>) -> Self {
        Self { automaton }
    }

    /// The automaton in use.
    #[must_use]
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Find, schedule and substitute superinstructions in `code`.
    ///
    /// Pure in `code`: equal inputs always yield equal outputs.
    ///
    /// # Errors
    ///
    /// Any internal invariant violation; see [`ConversionError`].
    pub fn convert(&self, code: &[u8]) -> Result<ConvertedCode, ConversionError> {
        let view = OpcodeView::split(code);
        let candidates = self.automaton.search(&view.opcodes);
        let plan = schedule(&candidates)?;
        check_block_boundary_invariant(&view.opcodes, &plan.selected)?;

        trace!(
            opcodes = view.len(),
            candidates = candidates.len(),
            selected = plan.len(),
            gain = plan.total_gain,
            "Scheduled superinstructions"
        );

        let wide = rewrite(&view, &plan.selected)?;
        check_length_invariant(code.len(), wide.len())?;

        Ok(ConvertedCode {
            code: wide,
            interpreter_code: InterpreterCode::from(code),
            estimated_speedup: estimated_speedup(view.len(), plan.total_gain),
            superinstructions: plan.len(),
            dispatches_saved: plan.total_gain,
        })
    }

    /// Schedule only, without rewriting. Useful for dictionary tuning.
    ///
    /// # Errors
    ///
    /// Scheduler post-condition failures.
    pub fn plan(&self, code: &[u8]) -> Result<Schedule, ConversionError> {
        let view = OpcodeView::split(code);
        schedule(&self.automaton.search(&view.opcodes))
    }
}

/// Merge `selected` (sorted, non-overlapping) back into a full-length stream,
/// replaying immediates from the side table in order.
///
/// # Errors
///
/// [`ConversionError::EmptyInterval`] for a zero-width interval,
/// [`ConversionError::ScheduleOutOfBounds`] if one runs past the opcode view,
/// [`ConversionError::MisalignedSchedule`] if one starts before the scan
/// position.
pub fn rewrite(view: &OpcodeView, selected: &[Occurrence]) -> Result<WideCode, ConversionError> {
    let opcodes = &view.opcodes;
    let mut immediates = view.immediates.iter().copied();
    let mut out = Vec::with_capacity(view.code_len());

    let mut replay = |out: &mut Vec<WideOpcode>, op: u8| {
        out.extend(
            immediates
                .by_ref()
                .take(immediate_len(op))
                .map(WideOpcode::from_byte),
        );
    };

    let mut pos = 0;
    for occ in selected {
        if occ.is_empty() {
            return Err(ConversionError::EmptyInterval {
                symbol: occ.symbol,
                start: occ.start,
                end: occ.end,
            });
        }
        if occ.end > opcodes.len() {
            return Err(ConversionError::ScheduleOutOfBounds {
                end: occ.end,
                len: opcodes.len(),
            });
        }
        while pos < occ.start {
            out.push(WideOpcode::from_byte(opcodes[pos]));
            replay(&mut out, opcodes[pos]);
            pos += 1;
        }
        if pos != occ.start {
            return Err(ConversionError::MisalignedSchedule {
                start: occ.start,
                position: pos,
            });
        }

        out.push(WideOpcode::from_symbol(occ.symbol));
        replay(&mut out, opcodes[pos]);
        pos += 1;
        while pos < occ.end {
            out.push(WideOpcode::NOP);
            replay(&mut out, opcodes[pos]);
            pos += 1;
        }
    }
    while pos < opcodes.len() {
        out.push(WideOpcode::from_byte(opcodes[pos]));
        replay(&mut out, opcodes[pos]);
        pos += 1;
    }

    Ok(WideCode(out))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::dictionary::PatternDictionary;

    fn rewriter(patterns: Vec<(u16, Vec<u8>)>) -> CodeRewriter {
        let mut dict = PatternDictionary::new();
        for (symbol, pattern) in patterns {
            dict.insert(symbol, pattern).unwrap();
        }
        CodeRewriter::new(Arc::new(Automaton::from_dictionary(&dict).unwrap()))
    }

    fn wide(values: &[u16]) -> WideCode {
        WideCode(values.iter().copied().map(WideOpcode).collect())
    }

    #[test]
    fn test_push_push_mstore() {
        // PUSH1 0x80 PUSH1 0x40 MSTORE
        let rw = rewriter(vec![(300, vec![0x60, 0x60, 0x52])]);
        let code = [0x60, 0x80, 0x60, 0x40, 0x52];
        let converted = rw.convert(&code).unwrap();

        assert_eq!(converted.code, wide(&[300, 0x80, 0xFFFF, 0x40, 0xFFFF]));
        assert_eq!(converted.superinstructions, 1);
        assert_eq!(converted.dispatches_saved, 2);
        assert!((converted.estimated_speedup - 3.0).abs() < f64::EPSILON);
        assert_eq!(converted.interpreter_code.as_slice(), &code);
    }

    #[test]
    fn test_immediates_never_matched() {
        // Pattern DUP1 DUP1 appears only inside PUSH2 data.
        let rw = rewriter(vec![(300, vec![0x80, 0x80])]);
        let code = [0x61, 0x80, 0x80, 0x01];
        let converted = rw.convert(&code).unwrap();
        assert_eq!(converted.code, WideCode::widen(&code));
        assert_eq!(converted.superinstructions, 0);
    }

    #[test]
    fn test_verbatim_between_superinstructions() {
        // SWAP1 POP | ADD | SWAP1 POP
        let rw = rewriter(vec![(400, vec![0x90, 0x50])]);
        let code = [0x90, 0x50, 0x01, 0x90, 0x50];
        let converted = rw.convert(&code).unwrap();
        assert_eq!(converted.code, wide(&[400, 0xFFFF, 0x01, 400, 0xFFFF]));
        assert_eq!(converted.code.symbol_count(), 2);
    }

    #[test]
    fn test_truncated_trailing_push_keeps_length() {
        let rw = rewriter(vec![(300, vec![0x01, 0x63])]);
        // ADD PUSH4 <2 bytes only>
        let code = [0x01, 0x63, 0xAA, 0xBB];
        let converted = rw.convert(&code).unwrap();
        assert_eq!(converted.code, wide(&[300, 0xFFFF, 0xAA, 0xBB]));
    }

    #[test]
    fn test_jumpdest_may_lead_a_superinstruction() {
        let rw = rewriter(vec![(300, vec![0x5B, 0x60, 0x01])]);
        let code = [0x5B, 0x60, 0x04, 0x01];
        let converted = rw.convert(&code).unwrap();
        assert_eq!(converted.code, wide(&[300, 0xFFFF, 0x04, 0xFFFF]));
    }

    #[test]
    fn test_empty_code() {
        let rw = rewriter(vec![(300, vec![0x01, 0x02])]);
        let converted = rw.convert(&[]).unwrap();
        assert!(converted.code.is_empty());
        assert!((converted.estimated_speedup - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rewrite_rejects_misaligned_schedule() {
        let view = OpcodeView::split(&[0x01, 0x02, 0x03, 0x04]);
        let overlapping = [Occurrence::new(300, 0, 3), Occurrence::new(301, 2, 4)];
        assert_eq!(
            rewrite(&view, &overlapping),
            Err(ConversionError::MisalignedSchedule {
                start: 2,
                position: 3
            })
        );
    }

    #[test]
    fn test_rewrite_rejects_out_of_bounds() {
        let view = OpcodeView::split(&[0x01, 0x02]);
        assert_eq!(
            rewrite(&view, &[Occurrence::new(300, 1, 3)]),
            Err(ConversionError::ScheduleOutOfBounds { end: 3, len: 2 })
        );
    }

    #[test]
    fn test_rewrite_rejects_empty_interval_at_end() {
        let view = OpcodeView::split(&[0x01]);
        assert_eq!(
            rewrite(&view, &[Occurrence::new(300, 1, 1)]),
            Err(ConversionError::EmptyInterval {
                symbol: 300,
                start: 1,
                end: 1
            })
        );
    }

    #[test]
    fn test_rewrite_rejects_empty_interval_inside_code() {
        let view = OpcodeView::split(&[0x01, 0x02, 0x03]);
        assert_eq!(
            rewrite(&view, &[Occurrence::new(300, 1, 1)]),
            Err(ConversionError::EmptyInterval {
                symbol: 300,
                start: 1,
                end: 1
            })
        );
    }

    #[test]
    fn test_rewrite_rejects_inverted_interval() {
        let view = OpcodeView::split(&[0x01, 0x02, 0x03]);
        assert!(matches!(
            rewrite(&view, &[Occurrence::new(300, 2, 1)]),
            Err(ConversionError::EmptyInterval { .. })
        ));
    }

    #[test]
    fn test_plan_reports_gain() {
        let rw = rewriter(vec![(300, vec![0x01, 0x02, 0x03])]);
        let plan = rw.plan(&[0x01, 0x02, 0x03, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.total_gain, 4);
    }
}
