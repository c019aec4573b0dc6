use anyhow::Context;
use epi_core::responses::IngestResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::IngestArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `epicast ingest`.
pub async fn handle_aggregates(
    args: &IngestArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let records = epi_ingest::read_aggregates(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let rows = ctx
        .db
        .upsert_aggregates(&records)
        .await
        .context("failed to store aggregate rows")?;

    respond(args, rows, flags)
}

/// Handle `epicast ingest-yearly`.
pub async fn handle_yearly(
    args: &IngestArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let series = epi_ingest::read_yearly(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let rows = ctx
        .db
        .upsert_yearly(&series)
        .await
        .context("failed to store yearly rows")?;

    respond(args, rows, flags)
}

fn respond(args: &IngestArgs, rows: usize, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.quiet {
        return Ok(());
    }
    output(
        &IngestResponse {
            source: args.path.display().to_string(),
            rows,
        },
        flags.format,
    )
}
