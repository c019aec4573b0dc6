//! # epi-pipeline
//!
//! The batch orchestrator of epicast. [`ForecastPipeline::run`] decides
//! whether synthetic yearly data is needed, forecasts each entity in
//! isolation, and hands the rows to the store for upsert.
//!
//! The pipeline does not retry. A store failure is
//! [`PipelineError::Upstream`] and ends the run; retrying is the
//! collaborator's business.

mod batch;
mod error;
mod pipeline;

pub use batch::{ForecastBatch, batch_provenance};
pub use error::PipelineError;
pub use pipeline::ForecastPipeline;
