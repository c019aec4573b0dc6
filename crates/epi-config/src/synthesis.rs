//! Synthetic series generation configuration.
//!
//! The threshold and multipliers have no derivation behind them; they are
//! exposed so they can be tuned without a rebuild.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_seed() -> u64 {
    42
}

const fn default_high_burden_threshold() -> u64 {
    10_000
}

const fn default_high_burden_slope() -> f64 {
    0.15
}

const fn default_low_burden_slope() -> f64 {
    0.05
}

const fn default_noise_ratio() -> f64 {
    0.1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    /// Seed for the noise generator.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Totals above this get the steeper slope.
    #[serde(default = "default_high_burden_threshold")]
    pub high_burden_threshold: u64,

    #[serde(default = "default_high_burden_slope")]
    pub high_burden_slope: f64,

    #[serde(default = "default_low_burden_slope")]
    pub low_burden_slope: f64,

    /// Noise standard deviation as a share of the per-year base.
    #[serde(default = "default_noise_ratio")]
    pub noise_ratio: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            high_burden_threshold: default_high_burden_threshold(),
            high_burden_slope: default_high_burden_slope(),
            low_burden_slope: default_low_burden_slope(),
            noise_ratio: default_noise_ratio(),
        }
    }
}

impl SynthesisConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("synthesis.high_burden_slope", self.high_burden_slope),
            ("synthesis.low_burden_slope", self.low_burden_slope),
            ("synthesis.noise_ratio", self.noise_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    "must be a finite non-negative number",
                ));
            }
        }
        Ok(())
    }
}
