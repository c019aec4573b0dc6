use std::collections::BTreeMap;

use epi_core::entities::{ForecastPoint, YearlySeries};
use epi_core::enums::Provenance;

/// Batch-level provenance: `real` if any series is real, otherwise
/// `synthetic`. `None` for an empty batch.
///
/// Every forecast row of a run carries this one flag, even for entities whose
/// own series is synthetic.
#[must_use]
pub fn batch_provenance(series: &[YearlySeries]) -> Option<Provenance> {
    if series.is_empty() {
        None
    } else if series.iter().any(|s| s.provenance == Provenance::Real) {
        Some(Provenance::Real)
    } else {
        Some(Provenance::Synthetic)
    }
}

/// Forecast rows for one run, ready for persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBatch {
    /// One row per `(entity, forecast year)`.
    pub rows: Vec<ForecastPoint>,
    /// Provenance stamped on every row.
    pub provenance: Option<Provenance>,
    /// Number of entities forecast.
    pub entities: usize,
    /// Entities per method label.
    pub methods: BTreeMap<String, usize>,
}

impl ForecastBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entities that degraded to a repeated mean.
    #[must_use]
    pub fn degraded(&self) -> usize {
        self.methods
            .iter()
            .filter(|(label, _)| label.as_str() != "holt-winters-additive")
            .map(|(_, n)| n)
            .sum()
    }
}
