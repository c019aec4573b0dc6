use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ForecastMethod, Provenance};

/// One forecasted year for one entity, as produced by a pipeline run.
///
/// Keyed by `(entity, year)`; newer runs overwrite older rows for the same key.
/// `provenance` is the batch-level flag of the run, not a per-entity property.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ForecastPoint {
    pub entity: String,
    pub year: i32,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
    pub method: ForecastMethod,
    pub provenance: Provenance,
}

/// A forecast row read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StoredForecast {
    #[serde(flatten)]
    pub forecast: ForecastPoint,
    pub created_at: DateTime<Utc>,
}
