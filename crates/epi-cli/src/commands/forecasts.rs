use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ForecastsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `epicast forecasts`.
pub async fn handle(args: &ForecastsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rows = ctx
        .db
        .list_forecasts(args.disease.as_deref())
        .await
        .context("failed to list forecasts")?;
    output(&rows, flags.format)
}
