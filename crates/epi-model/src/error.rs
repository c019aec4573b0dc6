//! Model error types for epi-model.
//!
//! These never cross the engine boundary: `ForecastEngine` folds them into a
//! degraded [`epi_core::enums::ForecastMethod`]. Only the synthesizer
//! surfaces them, for configuration problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Too few observations to fit the model.
    #[error("insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// An observation is NaN or infinite.
    #[error("non-finite observation at index {index}")]
    NonFinite { index: usize },

    /// Optimisation produced no usable parameters or forecasts.
    #[error("model fit failed: {0}")]
    FitFailed(String),

    /// A tunable is outside its domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The noise distribution could not be constructed.
    #[error("noise distribution: {0}")]
    Noise(String),
}
