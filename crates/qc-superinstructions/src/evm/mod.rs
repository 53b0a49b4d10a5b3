//! # EVM Bytecode Support
//!
//! The slice of EVM knowledge the converter needs. The interpreter itself,
//! gas, memory and the full opcode table live in the Smart Contracts
//! subsystem.
//!
//! ## Components
//!
//! - `opcodes.rs` - PUSH immediate lengths, block boundary marker
//! - `bytecode.rs` - Opcode view / immediate side table split

pub mod bytecode;
pub mod opcodes;

pub use bytecode::OpcodeView;
pub use opcodes::{immediate_len, is_block_boundary, JUMPDEST, PUSH1, PUSH32};
