use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Upsert the aggregate outbreak table from a CSV file.
    Ingest(IngestArgs),
    /// Upsert real per-year case counts (disease,year,cases) from a CSV file.
    IngestYearly(IngestArgs),
    /// Seed yearly series if none exist, forecast every disease, store results.
    Run,
    /// List stored forecasts.
    Forecasts(ForecastsArgs),
    /// Print the JSON Schema of an epicast type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    /// CSV file to read.
    pub path: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ForecastsArgs {
    /// Only show forecasts for this disease.
    #[arg(long)]
    pub disease: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type to describe.
    #[arg(value_enum)]
    pub type_name: SchemaType,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    ForecastPoint,
    YearlySeries,
    RunSummary,
    OutbreakRecord,
}
