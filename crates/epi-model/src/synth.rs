//! Synthetic yearly series from aggregate totals.
//!
//! Used only when the yearly store is completely empty. Every entity draws
//! from one seeded generator in generation order, so a run is reproducible
//! given the same seed and the same ordered totals.

use epi_core::entities::{EntityTotal, YearCount, YearlySeries};
use epi_core::enums::Provenance;
use epi_core::window::YearWindow;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Floor for the provisional sum when rescaling.
const SCALE_EPSILON: f64 = 1e-9;

/// Tunables for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParams {
    pub seed: u64,
    /// Totals strictly above this use `high_burden_slope`.
    pub high_burden_threshold: u64,
    pub high_burden_slope: f64,
    pub low_burden_slope: f64,
    /// Noise standard deviation as a share of the per-year base.
    pub noise_ratio: f64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            seed: 42,
            high_burden_threshold: 10_000,
            high_burden_slope: 0.15,
            low_burden_slope: 0.05,
            noise_ratio: 0.1,
        }
    }
}

/// Generates synthetic yearly series that sum exactly to their totals.
#[derive(Debug)]
pub struct SeriesSynthesizer {
    params: SynthesisParams,
    rng: StdRng,
}

impl SeriesSynthesizer {
    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` if `noise_ratio` or a slope is
    /// negative or non-finite.
    pub fn new(params: SynthesisParams) -> Result<Self, ModelError> {
        for (name, value) in [
            ("noise_ratio", params.noise_ratio),
            ("high_burden_slope", params.high_burden_slope),
            ("low_burden_slope", params.low_burden_slope),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidParameter {
                    name: name.into(),
                    reason: "must be a finite non-negative number".into(),
                });
            }
        }
        Ok(Self {
            params,
            rng: StdRng::seed_from_u64(params.seed),
        })
    }

    /// Synthesize one entity's series, advancing the shared generator.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Noise` if the noise spread overflows to a
    /// non-finite value.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn synthesize(
        &mut self,
        entity: &str,
        total_cases: u64,
        window: YearWindow,
    ) -> Result<YearlySeries, ModelError> {
        let n = window.len() as f64;
        let total = total_cases as f64;
        let base = total / n;

        let multiplier = if total_cases > self.params.high_burden_threshold {
            self.params.high_burden_slope
        } else {
            self.params.low_burden_slope
        };
        let slope = multiplier * base / n;

        let noise = Normal::new(0.0, base * self.params.noise_ratio)
            .map_err(|e| ModelError::Noise(e.to_string()))?;

        let provisional: Vec<f64> = (0..window.len())
            .map(|i| (base + slope * i as f64 + noise.sample(&mut self.rng)).max(0.0))
            .collect();

        let scale = total / provisional.iter().sum::<f64>().max(SCALE_EPSILON);
        let mut yearly: Vec<u64> = provisional
            .iter()
            .map(|v| (v * scale).round_ties_even().max(0.0) as u64)
            .collect();

        correct_drift(&mut yearly, total_cases);

        tracing::debug!(entity, total_cases, slope, scale, "synthesized yearly series");

        let points = window
            .years()
            .zip(yearly)
            .map(|(year, cases)| YearCount { year, cases })
            .collect();
        Ok(YearlySeries::new(
            entity.to_string(),
            points,
            Provenance::Synthetic,
        ))
    }

    /// Synthesize every entity in the given order.
    ///
    /// # Errors
    ///
    /// Returns the first `ModelError` raised by [`Self::synthesize`].
    pub fn synthesize_all(
        &mut self,
        totals: &[EntityTotal],
        window: YearWindow,
    ) -> Result<Vec<YearlySeries>, ModelError> {
        totals
            .iter()
            .map(|t| self.synthesize(&t.name, t.total_cases, window))
            .collect()
    }
}

/// Force `yearly` to sum to `total`.
///
/// The whole difference lands on the last year. A surplus larger than the
/// last year's value is taken from the preceding years, latest first, so no
/// value goes negative.
fn correct_drift(yearly: &mut [u64], total: u64) {
    let sum: u64 = yearly.iter().sum();
    let Some(last) = yearly.last_mut() else {
        return;
    };
    if sum <= total {
        *last += total - sum;
        return;
    }

    let mut surplus = sum - total;
    for value in yearly.iter_mut().rev() {
        let take = surplus.min(*value);
        *value -= take;
        surplus -= take;
        if surplus == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn window() -> YearWindow {
        YearWindow::new(2007, 2022).unwrap()
    }

    #[test]
    fn drift_deficit_goes_to_last_year() {
        let mut yearly = vec![3, 3, 3];
        correct_drift(&mut yearly, 11);
        assert_eq!(yearly, vec![3, 3, 5]);
    }

    #[test]
    fn drift_surplus_comes_off_last_year() {
        let mut yearly = vec![3, 3, 3];
        correct_drift(&mut yearly, 8);
        assert_eq!(yearly, vec![3, 3, 2]);
    }

    #[test]
    fn drift_surplus_beyond_last_year_walks_backwards() {
        let mut yearly = vec![1, 1, 1, 1];
        correct_drift(&mut yearly, 1);
        assert_eq!(yearly, vec![1, 0, 0, 0]);
    }

    #[test]
    fn zero_total_gives_all_zero_series() {
        let mut synth = SeriesSynthesizer::new(SynthesisParams::default()).unwrap();
        let series = synth.synthesize("Plague", 0, window()).unwrap();
        assert_eq!(series.len(), 16);
        assert!(series.points.iter().all(|p| p.cases == 0));
        assert_eq!(series.provenance, Provenance::Synthetic);
    }

    #[test]
    fn series_covers_window_in_order() {
        let mut synth = SeriesSynthesizer::new(SynthesisParams::default()).unwrap();
        let series = synth.synthesize("Cholera", 64_530, window()).unwrap();
        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, (2007..=2022).collect::<Vec<_>>());
        assert_eq!(series.total(), 64_530);
    }

    #[test]
    fn negative_noise_ratio_is_rejected() {
        let err = SeriesSynthesizer::new(SynthesisParams {
            noise_ratio: -1.0,
            ..SynthesisParams::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidParameter { ref name, .. } if name == "noise_ratio"
        ));
    }

    #[test]
    fn non_finite_slope_is_rejected() {
        let err = SeriesSynthesizer::new(SynthesisParams {
            high_burden_slope: f64::NAN,
            ..SynthesisParams::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidParameter { ref name, .. } if name == "high_burden_slope"
        ));
    }

    #[test]
    fn overflowing_noise_spread_is_a_noise_error() {
        let mut synth = SeriesSynthesizer::new(SynthesisParams {
            noise_ratio: f64::MAX,
            ..SynthesisParams::default()
        })
        .unwrap();
        let err = synth.synthesize("Measles", 500, window()).unwrap_err();
        assert!(matches!(err, ModelError::Noise(_)));
    }

    #[test]
    fn high_burden_entities_trend_upward() {
        // No noise isolates the injected trend.
        let mut synth = SeriesSynthesizer::new(SynthesisParams {
            noise_ratio: 0.0,
            ..SynthesisParams::default()
        })
        .unwrap();
        let series = synth.synthesize("Malaria", 160_000, window()).unwrap();
        let first = series.points.first().unwrap().cases;
        let last = series.points.last().unwrap().cases;
        assert!(last > first, "expected upward trend: {first} -> {last}");
    }

    #[test]
    fn generation_order_changes_later_series() {
        let params = SynthesisParams::default();

        let mut a = SeriesSynthesizer::new(params).unwrap();
        let first_a = a.synthesize("Anthrax", 900, window()).unwrap();

        let mut b = SeriesSynthesizer::new(params).unwrap();
        b.synthesize("Cholera", 64_530, window()).unwrap();
        let second_b = b.synthesize("Anthrax", 900, window()).unwrap();

        assert_eq!(first_a.total(), second_b.total());
        assert_ne!(first_a.points, second_b.points);
    }
}
