use anyhow::Context;
use epi_config::EpiConfig;
use epi_db::EpiDb;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub db: EpiDb,
    pub config: EpiConfig,
}

impl AppContext {
    /// Connect to the configured database, waiting for it if necessary.
    pub async fn init(config: EpiConfig) -> anyhow::Result<Self> {
        let db = EpiDb::connect(&config.database)
            .await
            .context("failed to open epicast database")?;
        Ok(Self { db, config })
    }
}
