//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete pattern sources for the `PatternSource` port.

pub mod json_source;
pub mod static_source;

pub use json_source::JsonPatternSource;
pub use static_source::StaticPatternSource;
