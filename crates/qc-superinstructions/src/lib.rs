//! # QC Superinstructions - Dispatch Reduction for EVM Bytecode
//!
//! **Consumer:** Smart Contracts (Subsystem 11) interpreter loop
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Rewrites contract bytecode into a wide instruction stream in which frequently
//! co-occurring opcode sequences are collapsed into a single superinstruction
//! symbol. Each collapsed sequence of `n` opcodes saves `n - 1` dispatches in the
//! interpreter loop.
//!
//! ## Pipeline
//!
//! ```text
//! raw code ──► OpcodeView::split ──► Automaton::search ──► schedule ──► rewrite ──► CodeCache
//!              (strip PUSH data)     (all occurrences)     (max gain)   (same length)
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Output length equals input length | `domain/invariants.rs` - `check_length_invariant()` |
//! | Selected intervals never overlap | `domain/invariants.rs` - `check_no_overlap_invariant()` |
//! | Traced gain equals optimal gain | `domain/invariants.rs` - `check_gain_invariant()` |
//! | No JUMPDEST inside a superinstruction | `domain/invariants.rs` - `check_block_boundary_invariant()` |
//!
//! Every violation is returned as a [`errors::ConversionError`] for that single
//! call. Nothing is cached when a conversion fails.
//!
//! ## Wide Instruction Alphabet
//!
//! | Range | Meaning |
//! |-------|---------|
//! | `0x0000..=0x00FF` | Raw EVM opcode or PUSH immediate byte |
//! | `0x0100..=0xFFFE` | Superinstruction symbol |
//! | `0xFFFF` | NOP placeholder (interior of a superinstruction) |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_superinstructions::prelude::*;
//!
//! let source = StaticPatternSource::evm_common();
//! let service = SuperinstructionService::initialize(&source, SuperinstructionConfig::default())?;
//!
//! let code = hex::decode("6080604052")?;
//! let converted = service.convert(&code, keccak256(&code))?;
//! assert_eq!(converted.code.len(), code.len());
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod evm;
pub mod metrics;
pub mod optimizer;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{ConvertedCode, Occurrence, Schedule};
    pub use crate::domain::services::{estimated_speedup, keccak256};
    pub use crate::domain::value_objects::{
        Hash, InterpreterCode, Symbol, WideCode, WideOpcode, FIRST_SYMBOL,
    };

    // Optimizer
    pub use crate::optimizer::{schedule, Automaton, CodeRewriter, PatternDictionary};

    // Bytecode
    pub use crate::evm::{immediate_len, OpcodeView};

    // Ports & adapters
    pub use crate::adapters::{JsonPatternSource, StaticPatternSource};
    pub use crate::ports::inbound::CodeConverter;
    pub use crate::ports::outbound::PatternSource;

    // Errors
    pub use crate::errors::{ConfigError, ConversionError, SuperinstructionError};

    // Service
    pub use crate::cache::CodeCache;
    pub use crate::config::SuperinstructionConfig;
    pub use crate::metrics::{ConversionMetrics, MetricsSnapshot};
    pub use crate::service::SuperinstructionService;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component name used in log lines.
pub const COMPONENT_NAME: &str = "Superinstructions";

// =============================================================================
// TESTS
// =============================================================================
