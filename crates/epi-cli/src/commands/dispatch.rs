use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Ingest(args) => commands::ingest::handle_aggregates(&args, ctx, flags).await,
        Commands::IngestYearly(args) => commands::ingest::handle_yearly(&args, ctx, flags).await,
        Commands::Run => commands::run::handle(ctx, flags).await,
        Commands::Forecasts(args) => commands::forecasts::handle(&args, ctx, flags).await,
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
