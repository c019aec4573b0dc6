use anyhow::Context;
use epi_pipeline::ForecastPipeline;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `epicast run`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let pipeline = ForecastPipeline::from_config(&ctx.config)?;
    let summary = pipeline
        .run(&ctx.db)
        .await
        .context("forecast run aborted")?;

    if flags.quiet {
        return Ok(());
    }
    output(&summary, flags.format)
}
