//! # Domain Layer (Inner Hexagon)
//!
//! Pure types and rules of superinstruction conversion.
//! NO I/O, NO locking, NO logging.

pub mod entities;
pub mod invariants;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
