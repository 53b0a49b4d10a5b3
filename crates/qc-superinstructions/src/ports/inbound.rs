//! # Driving Port (API - Inbound)
//!
//! The interface the interpreter uses to obtain converted code.

use crate::domain::entities::ConvertedCode;
use crate::domain::value_objects::Hash;
use crate::errors::ConversionError;
use std::sync::Arc;

/// Converts contract code into the wide instruction stream.
///
/// Implementations must be length preserving and deterministic in `code`.
/// `code_hash` identifies the code for caching; [`Hash::ZERO`] means the
/// identity is unknown and the result must not be cached.
pub trait CodeConverter: Send + Sync {
    /// Convert `code`, consulting the cache under `code_hash`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] on an internal invariant violation. The
    /// failure is scoped to this call.
    fn convert(&self, code: &[u8], code_hash: Hash) -> Result<Arc<ConvertedCode>, ConversionError>;
}
