//! CLI response types returned as JSON by `epicast` commands.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Provenance;

/// Response from `epicast ingest` and `epicast ingest-yearly`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestResponse {
    pub source: String,
    pub rows: usize,
}

/// Response from `epicast run`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunSummary {
    /// Whether this run generated synthetic yearly series.
    pub synthesized: bool,
    /// Entities a synthetic series was generated for.
    pub synthesized_entities: usize,
    /// Entities that were forecast.
    pub series_count: usize,
    /// Forecast rows written.
    pub forecast_rows: usize,
    /// Forecast years per entity.
    pub horizon: usize,
    /// Batch-level provenance stamped on every forecast row.
    pub provenance: Option<Provenance>,
    /// Entities per forecast method label.
    pub methods: BTreeMap<String, usize>,
}
