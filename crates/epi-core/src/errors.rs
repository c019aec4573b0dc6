//! Cross-cutting error types for epicast.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `ModelError`) are defined in
//! their respective crates. A unified error is deferred to `epi-cli` where
//! all crate errors converge.

use thiserror::Error;

/// Errors that can be raised by any epicast crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A historical window whose start year comes after its end year.
    #[error("Invalid year window: {start}..={end}")]
    InvalidWindow { start: i32, end: i32 },
}
