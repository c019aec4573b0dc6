//! Historical observation window.

use epi_core::window::{DEFAULT_END_YEAR, DEFAULT_START_YEAR, YearWindow};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_start_year() -> i32 {
    DEFAULT_START_YEAR
}

const fn default_end_year() -> i32 {
    DEFAULT_END_YEAR
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    /// First observed year.
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Last observed year (inclusive).
    #[serde(default = "default_end_year")]
    pub end_year: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
        }
    }
}

impl WindowConfig {
    /// Build the validated year window.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the start year is after the end year.
    pub fn year_window(&self) -> Result<YearWindow, ConfigError> {
        YearWindow::new(self.start_year, self.end_year)
            .map_err(|e| ConfigError::invalid("window", e.to_string()))
    }
}
