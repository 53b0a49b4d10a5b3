//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the conversion core and the outside world.
//!
//! - **Driving Port (Inbound)**: `CodeConverter`
//! - **Driven Port (Outbound)**: `PatternSource`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
