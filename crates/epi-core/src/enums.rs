//! Provenance and forecast method enums for epicast.
//!
//! Enums serialize to the exact strings stored in the database so that
//! rows can be parsed back with `serde_json`.

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Where a yearly series came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Real,
    Synthetic,
}

impl Provenance {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Synthetic => "synthetic",
        }
    }

    /// Parse a stored `source` column. Anything other than `synthetic` is real,
    /// which matches how the yearly table is queried for real data.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        if source == "synthetic" {
            Self::Synthetic
        } else {
            Self::Real
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ForecastMethod
// ---------------------------------------------------------------------------

/// How a forecast was produced for one entity.
///
/// ```text
/// series quality → method
///   < min points or all-zero → naive-mean
///   fit succeeded            → holt-winters-additive
///   fit failed               → fallback-mean (<reason>)
/// ```
///
/// Serializes as its tag string so JSON output and the `method` column agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ForecastMethod {
    NaiveMean,
    HoltAdditive,
    FallbackMean { reason: String },
}

impl ForecastMethod {
    /// Tag written to the `method` column of forecast rows.
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::NaiveMean => "naive-mean".to_string(),
            Self::HoltAdditive => "holt-winters-additive".to_string(),
            Self::FallbackMean { reason } => format!("fallback-mean ({reason})"),
        }
    }

    /// Short label without diagnostic detail, used for counting.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NaiveMean => "naive-mean",
            Self::HoltAdditive => "holt-winters-additive",
            Self::FallbackMean { .. } => "fallback-mean",
        }
    }

    /// Whether the method degraded to a repeated mean.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        !matches!(self, Self::HoltAdditive)
    }

    /// Parse a stored method tag back into a method.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for unknown tags.
    pub fn from_tag(tag: &str) -> Result<Self, CoreError> {
        match tag {
            "naive-mean" => Ok(Self::NaiveMean),
            "holt-winters-additive" => Ok(Self::HoltAdditive),
            other => other
                .strip_prefix("fallback-mean (")
                .and_then(|rest| rest.strip_suffix(')'))
                .map(|reason| Self::FallbackMean {
                    reason: reason.to_string(),
                })
                .ok_or_else(|| CoreError::Validation(format!("unknown forecast method '{tag}'"))),
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl From<ForecastMethod> for String {
    fn from(method: ForecastMethod) -> Self {
        method.tag()
    }
}

impl TryFrom<String> for ForecastMethod {
    type Error = CoreError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Self::from_tag(&tag)
    }
}

impl JsonSchema for ForecastMethod {
    fn schema_name() -> Cow<'static, str> {
        "ForecastMethod".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^(naive-mean|holt-winters-additive|fallback-mean \\(.*\\))$"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_storage_strings() {
        assert_eq!(Provenance::Real.as_str(), "real");
        assert_eq!(Provenance::Synthetic.as_str(), "synthetic");
        assert_eq!(Provenance::from_source("synthetic"), Provenance::Synthetic);
        assert_eq!(Provenance::from_source("moh-reports"), Provenance::Real);
    }

    #[test]
    fn method_tags() {
        assert_eq!(ForecastMethod::NaiveMean.tag(), "naive-mean");
        assert_eq!(ForecastMethod::HoltAdditive.tag(), "holt-winters-additive");
        let fallback = ForecastMethod::FallbackMean {
            reason: "non-finite sse".into(),
        };
        assert_eq!(fallback.tag(), "fallback-mean (non-finite sse)");
        assert_eq!(fallback.label(), "fallback-mean");
        assert!(fallback.is_degraded());
        assert!(!ForecastMethod::HoltAdditive.is_degraded());
    }

    #[test]
    fn method_tag_parses_back() {
        for method in [
            ForecastMethod::NaiveMean,
            ForecastMethod::HoltAdditive,
            ForecastMethod::FallbackMean {
                reason: "optimizer diverged (alpha=0.5)".into(),
            },
        ] {
            assert_eq!(ForecastMethod::from_tag(&method.tag()).unwrap(), method);
        }
        assert!(ForecastMethod::from_tag("arima").is_err());
    }
}
