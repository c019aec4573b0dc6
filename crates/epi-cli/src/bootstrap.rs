use anyhow::Context;
use epi_config::EpiConfig;

/// Load `.env`, then the layered figment configuration.
pub fn load_config() -> anyhow::Result<EpiConfig> {
    let config = EpiConfig::load_with_dotenv().context("failed to load epicast configuration")?;
    tracing::debug!(
        remote = config.database.is_remote(),
        horizon = config.forecast.horizon,
        start = config.window.start_year,
        end = config.window.end_year,
        "configuration loaded"
    );
    Ok(config)
}
