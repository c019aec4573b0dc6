use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Provenance;

/// Case count observed (or synthesized) for a single year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub cases: u64,
}

/// Ordered per-year case counts for one entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct YearlySeries {
    pub entity: String,
    pub points: Vec<YearCount>,
    pub provenance: Provenance,
}

impl YearlySeries {
    #[must_use]
    pub const fn new(entity: String, points: Vec<YearCount>, provenance: Provenance) -> Self {
        Self {
            entity,
            points,
            provenance,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all case counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.cases).sum()
    }

    /// Case counts as floats, in year order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.cases as f64).collect()
    }

    /// The last observed year, if any.
    #[must_use]
    pub fn last_year(&self) -> Option<i32> {
        self.points.iter().map(|p| p.year).max()
    }

    /// Sort points by year in place.
    pub fn sort_by_year(&mut self) {
        self.points.sort_by_key(|p| p.year);
    }
}
