//! Ingestion error types for epi-ingest.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV or a field that does not parse.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row parsed but violates a domain rule.
    #[error("line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    /// The same `(disease, year)` appears twice in a yearly file.
    #[error("line {line}: duplicate row for {disease} {year}")]
    Duplicate { line: u64, disease: String, year: i32 },
}
