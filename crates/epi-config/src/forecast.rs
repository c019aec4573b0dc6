//! Forecasting configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Years forecast beyond the last observed year.
const fn default_horizon() -> usize {
    3
}

/// Minimum series length for model fitting.
const fn default_min_fit_points() -> usize {
    4
}

/// Normal quantile for the approximate 95% band.
const fn default_z_score() -> f64 {
    1.96
}

/// Residual spread fallback as a share of the series mean.
const fn default_fallback_sd_ratio() -> f64 {
    0.15
}

/// Residual spread when the series mean is not positive.
const fn default_fallback_sd() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    #[serde(default = "default_min_fit_points")]
    pub min_fit_points: usize,

    #[serde(default = "default_z_score")]
    pub z_score: f64,

    #[serde(default = "default_fallback_sd_ratio")]
    pub fallback_sd_ratio: f64,

    #[serde(default = "default_fallback_sd")]
    pub fallback_sd: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            min_fit_points: default_min_fit_points(),
            z_score: default_z_score(),
            fallback_sd_ratio: default_fallback_sd_ratio(),
            fallback_sd: default_fallback_sd(),
        }
    }
}

impl ForecastConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::invalid("forecast.horizon", "must be at least 1"));
        }
        if self.min_fit_points < 2 {
            return Err(ConfigError::invalid(
                "forecast.min_fit_points",
                "must be at least 2",
            ));
        }
        if !self.z_score.is_finite() || self.z_score < 0.0 {
            return Err(ConfigError::invalid(
                "forecast.z_score",
                "must be a finite non-negative number",
            ));
        }
        if !self.fallback_sd_ratio.is_finite() || self.fallback_sd_ratio < 0.0 {
            return Err(ConfigError::invalid(
                "forecast.fallback_sd_ratio",
                "must be a finite non-negative number",
            ));
        }
        if !self.fallback_sd.is_finite() || self.fallback_sd < 0.0 {
            return Err(ConfigError::invalid(
                "forecast.fallback_sd",
                "must be a finite non-negative number",
            ));
        }
        Ok(())
    }
}
