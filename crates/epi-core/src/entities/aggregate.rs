use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One row of the aggregate outbreak table covering the whole observation window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct OutbreakRecord {
    pub disease: String,
    pub cases: u64,
    pub case_proportion_pct: f64,
    pub case_rank: u32,
    pub deaths: u64,
    pub death_proportion_pct: f64,
    pub death_rank: u32,
    pub outbreak_reports: u64,
    pub mortality_rate_pct: f64,
}

impl OutbreakRecord {
    /// Project the record onto the aggregate total the synthesizer needs.
    #[must_use]
    pub fn total(&self) -> EntityTotal {
        EntityTotal {
            name: self.disease.clone(),
            total_cases: self.cases,
        }
    }
}

/// A named category with its aggregate case count over the full window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct EntityTotal {
    pub name: String,
    pub total_cases: u64,
}
