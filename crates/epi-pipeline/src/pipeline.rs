//! Batch orchestration over an [`OutbreakStore`].
//!
//! ```text
//! run:
//!   seed_if_empty ── yearly store empty? ──► synthesize all totals ──► insert-if-absent
//!                 └─ any rows present ────► skip (existing rows are authoritative)
//!   load series ──► forecast_batch (per entity, isolated) ──► upsert forecasts
//! ```

use epi_config::EpiConfig;
use epi_core::entities::YearlySeries;
use epi_core::responses::RunSummary;
use epi_core::store::OutbreakStore;
use epi_core::window::YearWindow;
use epi_model::{ForecastEngine, ForecastParams, SeriesSynthesizer, SynthesisParams};

use crate::batch::{ForecastBatch, batch_provenance};
use crate::error::PipelineError;

/// Synthesize-if-empty, forecast, persist.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    window: YearWindow,
    synthesis: SynthesisParams,
    engine: ForecastEngine,
}

impl ForecastPipeline {
    /// # Errors
    ///
    /// Returns `PipelineError::Model` if the synthesis parameters are invalid.
    pub fn new(
        window: YearWindow,
        synthesis: SynthesisParams,
        engine: ForecastEngine,
    ) -> Result<Self, PipelineError> {
        SeriesSynthesizer::new(synthesis)?;
        Ok(Self {
            window,
            synthesis,
            engine,
        })
    }

    /// Build from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` for an invalid window, or
    /// `PipelineError::Model` for unusable engine or synthesis parameters.
    pub fn from_config(config: &EpiConfig) -> Result<Self, PipelineError> {
        let window = config.window.year_window()?;
        let synthesis = SynthesisParams {
            seed: config.synthesis.seed,
            high_burden_threshold: config.synthesis.high_burden_threshold,
            high_burden_slope: config.synthesis.high_burden_slope,
            low_burden_slope: config.synthesis.low_burden_slope,
            noise_ratio: config.synthesis.noise_ratio,
        };
        let engine = ForecastEngine::new(ForecastParams {
            horizon: config.forecast.horizon,
            min_fit_points: config.forecast.min_fit_points,
            z_score: config.forecast.z_score,
            fallback_sd_ratio: config.forecast.fallback_sd_ratio,
            fallback_sd: config.forecast.fallback_sd,
        })?;
        Self::new(window, synthesis, engine)
    }

    #[must_use]
    pub const fn window(&self) -> YearWindow {
        self.window
    }

    #[must_use]
    pub const fn engine(&self) -> &ForecastEngine {
        &self.engine
    }

    /// Fill the yearly store with synthetic series when it holds no rows at all.
    ///
    /// Returns the number of entities synthesized, or `None` when the store
    /// already had rows and synthesis was skipped.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Upstream` if the store fails, or
    /// `PipelineError::Model` if synthesis parameters are invalid.
    pub async fn seed_if_empty<S: OutbreakStore>(
        &self,
        store: &S,
    ) -> Result<Option<usize>, PipelineError> {
        let existing = store
            .count_yearly_rows()
            .await
            .map_err(PipelineError::upstream)?;
        if existing > 0 {
            tracing::info!(rows = existing, "yearly series present; skipping synthesis");
            return Ok(None);
        }

        let totals = store.list_totals().await.map_err(PipelineError::upstream)?;
        tracing::info!(
            entities = totals.len(),
            start = self.window.start(),
            end = self.window.end(),
            "no yearly data; synthesizing from aggregate totals"
        );

        let mut synthesizer = SeriesSynthesizer::new(self.synthesis)?;
        let series = synthesizer.synthesize_all(&totals, self.window)?;
        let inserted = store
            .insert_yearly_series(&series)
            .await
            .map_err(PipelineError::upstream)?;
        tracing::info!(entities = series.len(), rows = inserted, "stored synthetic series");

        Ok(Some(series.len()))
    }

    /// Forecast every non-empty series independently.
    ///
    /// Never fails: a series the model cannot handle comes back with a
    /// degraded method instead.
    #[must_use]
    pub fn forecast_batch(&self, series: &[YearlySeries]) -> ForecastBatch {
        let provenance = batch_provenance(series);
        let mut batch = ForecastBatch {
            provenance,
            ..ForecastBatch::default()
        };
        let Some(stamp) = provenance else {
            return batch;
        };

        for s in series {
            if s.is_empty() {
                tracing::warn!(entity = %s.entity, "series has no observations; skipping");
                continue;
            }
            let outcome = self.engine.forecast(s);
            if outcome.method.is_degraded() {
                tracing::warn!(
                    entity = %s.entity,
                    method = %outcome.method,
                    points = s.len(),
                    "forecast degraded to mean"
                );
            } else {
                tracing::debug!(entity = %s.entity, points = s.len(), "forecast fitted");
            }
            *batch
                .methods
                .entry(outcome.method.label().to_string())
                .or_default() += 1;
            batch.entities += 1;
            batch.rows.extend(outcome.into_points(&s.entity, stamp));
        }
        batch
    }

    /// Run the full pipeline against a store.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Upstream` on any store failure. Model
    /// problems for individual entities do not abort the run.
    pub async fn run<S: OutbreakStore>(&self, store: &S) -> Result<RunSummary, PipelineError> {
        let synthesized = self.seed_if_empty(store).await?;

        let series = store
            .load_yearly_series()
            .await
            .map_err(PipelineError::upstream)?;
        tracing::info!(series = series.len(), "loaded yearly series");

        let batch = self.forecast_batch(&series);
        let written = if batch.is_empty() {
            0
        } else {
            store
                .upsert_forecasts(&batch.rows)
                .await
                .map_err(PipelineError::upstream)?
        };
        tracing::info!(
            rows = written,
            entities = batch.entities,
            degraded = batch.degraded(),
            provenance = ?batch.provenance,
            "wrote forecasts"
        );

        Ok(RunSummary {
            synthesized: synthesized.is_some(),
            synthesized_entities: synthesized.unwrap_or(0),
            series_count: batch.entities,
            forecast_rows: written,
            horizon: self.engine.horizon(),
            provenance: batch.provenance,
            methods: batch.methods,
        })
    }
}

impl Default for ForecastPipeline {
    fn default() -> Self {
        Self {
            window: YearWindow::default(),
            synthesis: SynthesisParams::default(),
            engine: ForecastEngine::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use epi_core::entities::YearCount;
    use epi_core::enums::{ForecastMethod, Provenance};
    use epi_model::ModelError;
    use pretty_assertions::assert_eq;

    fn series(entity: &str, start: i32, cases: &[u64], provenance: Provenance) -> YearlySeries {
        let points = cases
            .iter()
            .zip(start..)
            .map(|(&cases, year)| YearCount { year, cases })
            .collect();
        YearlySeries::new(entity.into(), points, provenance)
    }

    #[test]
    fn batch_stamps_global_provenance_on_every_row() {
        let pipeline = ForecastPipeline::default();
        let batch = pipeline.forecast_batch(&[
            series("Cholera", 2019, &[100, 120, 140, 160], Provenance::Synthetic),
            series("Measles", 2020, &[5, 7], Provenance::Real),
        ]);

        assert_eq!(batch.entities, 2);
        assert_eq!(batch.rows.len(), 6);
        assert!(batch.rows.iter().all(|r| r.provenance == Provenance::Real));
    }

    #[test]
    fn entities_are_forecast_independently() {
        let pipeline = ForecastPipeline::default();
        let cholera = series("Cholera", 2019, &[100, 120, 140, 160], Provenance::Real);
        let rabies = series("Rabies", 2015, &[0, 0, 0, 0], Provenance::Real);

        let together = pipeline.forecast_batch(&[cholera.clone(), rabies.clone()]);
        let reversed = pipeline.forecast_batch(&[rabies, cholera.clone()]);
        let alone = pipeline.forecast_batch(&[cholera]);

        let cholera_rows = |b: &ForecastBatch| {
            b.rows
                .iter()
                .filter(|r| r.entity == "Cholera")
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(cholera_rows(&together), cholera_rows(&alone));
        assert_eq!(cholera_rows(&reversed), cholera_rows(&alone));
        assert_eq!(
            together.methods,
            BTreeMap::from([
                ("holt-winters-additive".to_string(), 1),
                ("naive-mean".to_string(), 1),
            ])
        );
    }

    #[test]
    fn empty_series_are_skipped() {
        let pipeline = ForecastPipeline::default();
        let batch = pipeline.forecast_batch(&[
            YearlySeries::new("Ghost".into(), Vec::new(), Provenance::Synthetic),
            series("Anthrax", 2021, &[2, 4], Provenance::Synthetic),
        ]);
        assert_eq!(batch.entities, 1);
        assert!(batch.rows.iter().all(|r| r.entity == "Anthrax"));
        assert!(
            batch
                .rows
                .iter()
                .all(|r| r.method == ForecastMethod::NaiveMean)
        );
    }

    #[test]
    fn empty_input_gives_empty_batch() {
        let batch = ForecastPipeline::default().forecast_batch(&[]);
        assert!(batch.is_empty());
        assert_eq!(batch.provenance, None);
    }

    #[test]
    fn from_config_carries_horizon_and_window() {
        let mut config = EpiConfig::default();
        config.forecast.horizon = 5;
        config.window.start_year = 2010;
        let pipeline = ForecastPipeline::from_config(&config).unwrap();

        assert_eq!(pipeline.engine().horizon(), 5);
        assert_eq!(pipeline.window().start(), 2010);
        assert_eq!(pipeline.window().end(), 2022);
    }

    #[test]
    fn from_config_passes_fallback_sd_to_engine() {
        let mut config = EpiConfig::default();
        config.forecast.fallback_sd = f64::NAN;
        assert!(matches!(
            ForecastPipeline::from_config(&config),
            Err(PipelineError::Model(ModelError::InvalidParameter { ref name, .. }))
                if name == "fallback_sd"
        ));
    }

    #[test]
    fn from_config_rejects_negative_noise_ratio() {
        let mut config = EpiConfig::default();
        config.synthesis.noise_ratio = -0.1;
        assert!(matches!(
            ForecastPipeline::from_config(&config),
            Err(PipelineError::Model(ModelError::InvalidParameter { ref name, .. }))
                if name == "noise_ratio"
        ));
    }

    #[test]
    fn new_rejects_negative_noise_ratio() {
        let result = ForecastPipeline::new(
            YearWindow::default(),
            SynthesisParams {
                noise_ratio: -1.0,
                ..SynthesisParams::default()
            },
            ForecastEngine::default(),
        );
        assert!(matches!(result, Err(PipelineError::Model(_))));
    }

    #[test]
    fn from_config_rejects_inverted_window() {
        let mut config = EpiConfig::default();
        config.window.start_year = 2030;
        assert!(matches!(
            ForecastPipeline::from_config(&config),
            Err(PipelineError::Config(_))
        ));
    }
}
