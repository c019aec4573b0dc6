use epi_core::entities::{ForecastPoint, OutbreakRecord, YearlySeries};
use epi_core::responses::RunSummary;
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `epicast schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_json(args.type_name)?, flags.format)
}

/// JSON Schema for one of the user-facing types.
pub fn schema_json(type_name: SchemaType) -> anyhow::Result<serde_json::Value> {
    let schema = match type_name {
        SchemaType::ForecastPoint => schema_for!(ForecastPoint),
        SchemaType::YearlySeries => schema_for!(YearlySeries),
        SchemaType::RunSummary => schema_for!(RunSummary),
        SchemaType::OutbreakRecord => schema_for!(OutbreakRecord),
    };
    Ok(serde_json::to_value(schema)?)
}
