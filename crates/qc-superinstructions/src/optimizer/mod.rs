//! # Superinstruction Optimizer
//!
//! Turns EVM bytecode into a wide instruction stream with fewer dispatches.
//!
//! ## Approach
//!
//! Multi-pattern matching over the opcode view, then weighted interval
//! scheduling to pick the best non-overlapping set of matches.
//!
//! ## Components
//!
//! - `dictionary.rs` - Validated symbol → pattern table
//! - `automaton.rs` - Aho–Corasick matcher
//! - `scheduler.rs` - Maximum-gain interval selection
//! - `rewriter.rs` - Length-preserving substitution

pub mod automaton;
pub mod dictionary;
pub mod rewriter;
pub mod scheduler;

pub use automaton::Automaton;
pub use dictionary::{DictionaryEntry, DictionaryFile, PatternDictionary};
pub use rewriter::{rewrite, CodeRewriter};
pub use scheduler::schedule;
