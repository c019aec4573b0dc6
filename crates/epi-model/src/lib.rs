//! # epi-model
//!
//! The numerical core of epicast:
//! - [`SeriesSynthesizer`] manufactures a per-year series from an aggregate
//!   total when no yearly data exists, with a mild trend and seeded noise,
//!   rescaled so it sums exactly to the total.
//! - [`ForecastEngine`] fits an additive-trend exponential smoothing model
//!   (Holt's linear method) per series and projects it forward, degrading to
//!   a repeated mean when the series is too short, all-zero, or unfittable.
//!
//! Nothing in this crate performs I/O.

pub mod engine;
pub mod error;
pub mod holt;
pub mod synth;

pub use engine::{ForecastEngine, ForecastOutcome, ForecastParams, SeriesQuality};
pub use error::ModelError;
pub use holt::HoltLinear;
pub use synth::{SeriesSynthesizer, SynthesisParams};

/// Arithmetic mean; `0.0` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (Bessel's correction). `None` below two values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
