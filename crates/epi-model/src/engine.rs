//! Per-series forecasting with fallback policies.
//!
//! ```text
//! series ── len < min_fit_points or sum == 0 ──► Insufficient ──► naive-mean
//!        └─ otherwise ──► Fit ──┬─ ok ─────────────────────────► holt-winters-additive
//!                               └─ ModelError ──► FitFailed ───► fallback-mean (<error>)
//! ```
//!
//! [`ForecastEngine::forecast`] is infallible: every model problem is folded
//! into a degraded [`ForecastMethod`], so one bad series cannot abort a batch.

use epi_core::entities::{ForecastPoint, YearlySeries};
use epi_core::enums::{ForecastMethod, Provenance};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::holt::HoltLinear;
use crate::{mean, sample_std};

/// Points, lower bounds, upper bounds.
type Band = (Vec<f64>, Vec<f64>, Vec<f64>);

/// Tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Years to forecast past the last observed year.
    pub horizon: usize,
    /// Series shorter than this are not fitted.
    pub min_fit_points: usize,
    /// Normal quantile for the confidence band.
    pub z_score: f64,
    /// Residual spread fallback as a share of the series mean.
    pub fallback_sd_ratio: f64,
    /// Residual spread when the series mean is not positive.
    pub fallback_sd: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            horizon: 3,
            min_fit_points: 4,
            z_score: 1.96,
            fallback_sd_ratio: 0.15,
            fallback_sd: 1.0,
        }
    }
}

/// Quality classification of an input series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesQuality {
    /// Fewer than `min_fit_points` observations.
    TooShort { len: usize },
    /// Every case count is zero.
    AllZero,
    /// Eligible for model fitting.
    Fittable,
}

/// Forecast for one series: `horizon` years with point and band.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub years: Vec<i32>,
    pub points: Vec<f64>,
    pub lowers: Vec<f64>,
    pub uppers: Vec<f64>,
    pub method: ForecastMethod,
}

impl ForecastOutcome {
    /// Number of forecast years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Expand into one row per forecast year, stamped with the batch provenance.
    #[must_use]
    pub fn into_points(self, entity: &str, provenance: Provenance) -> Vec<ForecastPoint> {
        let method = self.method;
        self.years
            .into_iter()
            .zip(self.points)
            .zip(self.lowers.into_iter().zip(self.uppers))
            .map(|((year, point), (lower, upper))| ForecastPoint {
                entity: entity.to_string(),
                year,
                point,
                lower,
                upper,
                method: method.clone(),
                provenance,
            })
            .collect()
    }
}

/// Fits and projects one series at a time.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    params: ForecastParams,
}

impl ForecastEngine {
    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` if `horizon` is zero or a band
    /// parameter is negative or non-finite.
    pub fn new(params: ForecastParams) -> Result<Self, ModelError> {
        if params.horizon == 0 {
            return Err(ModelError::InvalidParameter {
                name: "horizon".into(),
                reason: "must be at least 1".into(),
            });
        }
        for (name, value) in [
            ("z_score", params.z_score),
            ("fallback_sd_ratio", params.fallback_sd_ratio),
            ("fallback_sd", params.fallback_sd),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidParameter {
                    name: name.into(),
                    reason: "must be a finite non-negative number".into(),
                });
            }
        }
        Ok(Self { params })
    }

    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.params.horizon
    }

    /// Classify a series before forecasting it.
    #[must_use]
    pub fn assess(&self, series: &YearlySeries) -> SeriesQuality {
        if series.len() < self.params.min_fit_points {
            SeriesQuality::TooShort { len: series.len() }
        } else if series.total() == 0 {
            SeriesQuality::AllZero
        } else {
            SeriesQuality::Fittable
        }
    }

    /// Forecast `horizon` years past the series' last observed year.
    ///
    /// The series is ordered by year first. An empty series forecasts a mean
    /// of zero anchored after year 0.
    #[must_use]
    pub fn forecast(&self, series: &YearlySeries) -> ForecastOutcome {
        let mut ordered = series.clone();
        ordered.sort_by_year();
        let values = ordered.values();
        let years = self.forecast_years(ordered.last_year().unwrap_or(0));

        match self.assess(&ordered) {
            SeriesQuality::TooShort { .. } | SeriesQuality::AllZero => {
                self.repeated_mean(years, &values, ForecastMethod::NaiveMean)
            }
            SeriesQuality::Fittable => {
                let fit = self.fit(&values);
                self.resolve(&series.entity, years, &values, fit)
            }
        }
    }

    /// Turn a fit attempt into an outcome, falling back to the mean on error.
    fn resolve(
        &self,
        entity: &str,
        years: Vec<i32>,
        values: &[f64],
        fit: Result<Band, ModelError>,
    ) -> ForecastOutcome {
        match fit {
            Ok((points, lowers, uppers)) => ForecastOutcome {
                years,
                points,
                lowers,
                uppers,
                method: ForecastMethod::HoltAdditive,
            },
            Err(error) => {
                tracing::warn!(entity, %error, "model fit failed; using mean");
                self.repeated_mean(
                    years,
                    values,
                    ForecastMethod::FallbackMean {
                        reason: error.to_string(),
                    },
                )
            }
        }
    }

    fn fit(&self, values: &[f64]) -> Result<Band, ModelError> {
        let model = HoltLinear::fit(values)?;
        let points = model.predict(self.params.horizon);
        let residuals = model.residuals(values);

        let sd = sample_std(&residuals).unwrap_or_else(|| {
            let m = mean(values);
            if m > 0.0 {
                self.params.fallback_sd_ratio * m
            } else {
                self.params.fallback_sd
            }
        });
        let half_width = self.params.z_score * sd;

        let lowers: Vec<f64> = points.iter().map(|p| p - half_width).collect();
        let uppers: Vec<f64> = points.iter().map(|p| p + half_width).collect();

        if let Some(index) = points
            .iter()
            .chain(&lowers)
            .chain(&uppers)
            .position(|v| !v.is_finite())
        {
            return Err(ModelError::FitFailed(format!(
                "non-finite forecast output at position {index}"
            )));
        }

        let (level, trend) = model.components();
        tracing::debug!(
            alpha = model.alpha(),
            beta = model.beta(),
            level,
            trend,
            sse = model.sse(),
            sd,
            "fitted holt linear model"
        );
        Ok((points, lowers, uppers))
    }

    fn repeated_mean(
        &self,
        years: Vec<i32>,
        values: &[f64],
        method: ForecastMethod,
    ) -> ForecastOutcome {
        let m = mean(values);
        let repeated = vec![m; self.params.horizon];
        ForecastOutcome {
            years,
            points: repeated.clone(),
            lowers: repeated.clone(),
            uppers: repeated,
            method,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn forecast_years(&self, last_year: i32) -> Vec<i32> {
        (1..=self.params.horizon as i32)
            .map(|h| last_year + h)
            .collect()
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self {
            params: ForecastParams::default(),
        }
    }
}
