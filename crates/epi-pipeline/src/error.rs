//! Pipeline error types.
//!
//! Per-entity model problems never appear here; the engine absorbs them.
//! What remains is fatal for the run.

use epi_config::ConfigError;
use epi_model::ModelError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The persistence collaborator failed; the run cannot continue.
    #[error("store unavailable: {0}")]
    Upstream(#[source] BoxError),

    /// Synthesis or engine parameters are unusable.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Configuration could not be turned into pipeline parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    pub(crate) fn upstream<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream(Box::new(error))
    }
}
