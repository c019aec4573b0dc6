//! # epi-config
//!
//! Layered configuration loading for epicast using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EPICAST_*` prefix, `__` as separator)
//! 2. Project-level `.epicast/config.toml`
//! 3. User-level `~/.config/epicast/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `EPICAST_DATABASE__PATH` -> `database.path`,
//! `EPICAST_FORECAST__HORIZON` -> `forecast.horizon`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use epi_config::EpiConfig;
//!
//! let config = EpiConfig::load_with_dotenv().expect("config");
//! println!("forecasting {} years ahead", config.forecast.horizon);
//! ```

mod database;
mod error;
mod forecast;
mod synthesis;
mod window;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use forecast::ForecastConfig;
pub use synthesis::SynthesisConfig;
pub use window::WindowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EpiConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

impl EpiConfig {
    /// Load and validate configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".epicast/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("EPICAST_").split("__"))
    }

    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.window.year_window()?;
        self.forecast.validate()?;
        self.synthesis.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("epicast").join("config.toml"))
    }
}
