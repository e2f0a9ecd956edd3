//! Cross-cutting error types for Waveflow.
//!
//! This module defines errors raised while constructing core values.
//! Pipeline errors (unknown waves, missing columns, rule conflicts) live in
//! `wave-transitions`, configuration errors in `wave-config`.

use thiserror::Error;

/// Errors that can be raised by any Waveflow crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A color string is not in `#RRGGBB` form.
    #[error("Invalid color '{value}': expected #RRGGBB")]
    InvalidColor { value: String },

    /// A wave definition is missing its id or column prefix.
    #[error("Invalid wave definition '{id}': {reason}")]
    InvalidWaveDefinition { id: String, reason: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
