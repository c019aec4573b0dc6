//! Holt's linear trend method (additive trend, no seasonality).
//!
//! ```text
//! level_t = α * y_t + (1 - α) * (level_{t-1} + trend_{t-1})
//! trend_t = β * (level_t - level_{t-1}) + (1 - β) * trend_{t-1}
//! ŷ_t     = level_{t-1} + trend_{t-1}
//! ```
//!
//! ## Estimation
//!
//! For fixed `(α, β)` the one-step-ahead fitted values are linear in the
//! initial level and trend, so those are solved exactly by least squares.
//! `(α, β)` are chosen by a coarse grid search over (0, 1) followed by a finer
//! grid around the coarse optimum, minimising the sum of squared errors.

use crate::error::ModelError;

/// Coarse grid resolution over (0, 1).
const COARSE_STEP: f64 = 0.05;

/// Fine grid resolution around the coarse optimum.
const FINE_STEP: f64 = 0.005;

/// Smallest and largest smoothing parameter considered.
const PARAM_MIN: f64 = 0.005;
const PARAM_MAX: f64 = 0.995;

/// Minimum observations: two unknown initial states.
const MIN_POINTS: usize = 2;

/// A fitted Holt linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct HoltLinear {
    alpha: f64,
    beta: f64,
    initial_level: f64,
    initial_trend: f64,
    level: f64,
    trend: f64,
    fitted: Vec<f64>,
    sse: f64,
}

/// Output of one pass of the recursions.
struct Pass {
    fitted: Vec<f64>,
    level: f64,
    trend: f64,
}

impl HoltLinear {
    /// Fit with estimated smoothing parameters and initial states.
    ///
    /// # Errors
    ///
    /// - `ModelError::InsufficientData` below two observations.
    /// - `ModelError::NonFinite` if any observation is NaN or infinite.
    /// - `ModelError::FitFailed` if no parameter pair yields a finite error.
    pub fn fit(data: &[f64]) -> Result<Self, ModelError> {
        check_data(data)?;

        let coarse = grid(COARSE_STEP, PARAM_MIN, PARAM_MAX);
        let (alpha, beta, coarse_sse) = best_on_grid(data, &coarse, &coarse)?;

        let fine_alpha = grid(
            FINE_STEP,
            (alpha - COARSE_STEP).max(PARAM_MIN),
            (alpha + COARSE_STEP).min(PARAM_MAX),
        );
        let fine_beta = grid(
            FINE_STEP,
            (beta - COARSE_STEP).max(PARAM_MIN),
            (beta + COARSE_STEP).min(PARAM_MAX),
        );
        let (alpha, beta) = match best_on_grid(data, &fine_alpha, &fine_beta) {
            Ok((fa, fb, fine_sse)) if fine_sse <= coarse_sse => (fa, fb),
            _ => (alpha, beta),
        };

        Self::with_params(data, alpha, beta)
    }

    /// Fit with fixed smoothing parameters; initial states are still estimated.
    ///
    /// # Errors
    ///
    /// - `ModelError::InvalidParameter` unless `0 < alpha, beta < 1`.
    /// - `ModelError::InsufficientData` / `ModelError::NonFinite` as for [`Self::fit`].
    /// - `ModelError::FitFailed` if the resulting error is not finite.
    pub fn with_params(data: &[f64], alpha: f64, beta: f64) -> Result<Self, ModelError> {
        for (name, value) in [("alpha", alpha), ("beta", beta)] {
            if !(0.0 < value && value < 1.0) {
                return Err(ModelError::InvalidParameter {
                    name: name.to_string(),
                    reason: "must be between 0 and 1 (exclusive)".to_string(),
                });
            }
        }
        check_data(data)?;

        let (initial_level, initial_trend) = estimate_initial_states(data, alpha, beta);
        let pass = run(data, alpha, beta, initial_level, initial_trend);
        let sse = sse(data, &pass.fitted);
        if !sse.is_finite() {
            return Err(ModelError::FitFailed(format!(
                "non-finite sse at alpha={alpha:.3}, beta={beta:.3}"
            )));
        }

        Ok(Self {
            alpha,
            beta,
            initial_level,
            initial_trend,
            level: pass.level,
            trend: pass.trend,
            fitted: pass.fitted,
            sse,
        })
    }

    /// Forecast `steps` periods past the last observation.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn predict(&self, steps: usize) -> Vec<f64> {
        (1..=steps)
            .map(|h| self.level + h as f64 * self.trend)
            .collect()
    }

    /// `observed - fitted` for each input point.
    #[must_use]
    pub fn residuals(&self, data: &[f64]) -> Vec<f64> {
        data.iter()
            .zip(&self.fitted)
            .map(|(y, f)| y - f)
            .collect()
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub const fn beta(&self) -> f64 {
        self.beta
    }

    /// Estimated `(level, trend)` before the first observation.
    #[must_use]
    pub const fn initial_states(&self) -> (f64, f64) {
        (self.initial_level, self.initial_trend)
    }

    /// Final `(level, trend)` after the last observation.
    #[must_use]
    pub const fn components(&self) -> (f64, f64) {
        (self.level, self.trend)
    }

    #[must_use]
    pub const fn sse(&self) -> f64 {
        self.sse
    }
}

fn check_data(data: &[f64]) -> Result<(), ModelError> {
    if data.len() < MIN_POINTS {
        return Err(ModelError::InsufficientData {
            required: MIN_POINTS,
            actual: data.len(),
        });
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite { index });
    }
    Ok(())
}

fn run(data: &[f64], alpha: f64, beta: f64, level0: f64, trend0: f64) -> Pass {
    let mut level = level0;
    let mut trend = trend0;
    let mut fitted = Vec::with_capacity(data.len());

    for &value in data {
        fitted.push(level + trend);
        let prev_level = level;
        level = alpha * value + (1.0 - alpha) * (level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
    }

    Pass {
        fitted,
        level,
        trend,
    }
}

fn sse(data: &[f64], fitted: &[f64]) -> f64 {
    data.iter()
        .zip(fitted)
        .map(|(y, f)| (y - f).powi(2))
        .sum()
}

/// Least-squares initial level and trend for fixed `(alpha, beta)`.
///
/// Fitted values decompose as `level0 * u + trend0 * v + w`, where `u` and
/// `v` are the responses to a unit initial state on zero data and `w` is the
/// response to the data from a zero state.
fn estimate_initial_states(data: &[f64], alpha: f64, beta: f64) -> (f64, f64) {
    let zeros = vec![0.0; data.len()];
    let u = run(&zeros, alpha, beta, 1.0, 0.0).fitted;
    let v = run(&zeros, alpha, beta, 0.0, 1.0).fitted;
    let w = run(data, alpha, beta, 0.0, 0.0).fitted;

    let (mut suu, mut svv, mut suv, mut sur, mut svr) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for i in 0..data.len() {
        let r = data[i] - w[i];
        suu += u[i] * u[i];
        svv += v[i] * v[i];
        suv += u[i] * v[i];
        sur += u[i] * r;
        svr += v[i] * r;
    }

    let det = suu.mul_add(svv, -(suv * suv));
    if det.abs() <= f64::EPSILON * suu * svv || !det.is_finite() {
        // Degenerate design; use the heuristic start.
        return (data[0], data[1] - data[0]);
    }

    (
        svv.mul_add(sur, -(suv * svr)) / det,
        suu.mul_add(svr, -(suv * sur)) / det,
    )
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grid(step: f64, lo: f64, hi: f64) -> Vec<f64> {
    let count = ((hi - lo) / step).floor() as usize;
    (0..=count).map(|k| lo + k as f64 * step).collect()
}

fn best_on_grid(
    data: &[f64],
    alphas: &[f64],
    betas: &[f64],
) -> Result<(f64, f64, f64), ModelError> {
    let mut best: Option<(f64, f64, f64)> = None;
    for &alpha in alphas {
        for &beta in betas {
            let (l0, b0) = estimate_initial_states(data, alpha, beta);
            let candidate = sse(data, &run(data, alpha, beta, l0, b0).fitted);
            if !candidate.is_finite() {
                continue;
            }
            if best.is_none_or(|(_, _, current)| candidate < current) {
                best = Some((alpha, beta, candidate));
            }
        }
    }
    best.ok_or_else(|| ModelError::FitFailed("no smoothing parameters gave a finite error".into()))
}
