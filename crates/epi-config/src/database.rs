//! libSQL connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default local database file.
fn default_path() -> String {
    ".epicast/epicast.db".to_string()
}

/// Default connection attempts before the store is declared unavailable.
const fn default_connect_attempts() -> u32 {
    20
}

/// Default pause between connection attempts, in milliseconds.
const fn default_connect_delay_ms() -> u64 {
    3_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file (or `:memory:`). Used when `url` is empty.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL (e.g., `libsql://outbreaks.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,

    /// Connection attempts before giving up.
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Pause between connection attempts, in milliseconds.
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
            connect_attempts: default_connect_attempts(),
            connect_delay_ms: default_connect_delay_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Check if a remote database is configured.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_attempts == 0 {
            return Err(ConfigError::invalid(
                "database.connect_attempts",
                "must be at least 1",
            ));
        }
        if !self.is_remote() && self.path.is_empty() {
            return Err(ConfigError::invalid(
                "database.path",
                "must be set when database.url is empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local() {
        let config = DatabaseConfig::default();
        assert!(!config.is_remote());
        assert_eq!(config.path, ".epicast/epicast.db");
        assert_eq!(config.connect_attempts, 20);
        assert_eq!(config.connect_delay_ms, 3_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn remote_when_url_set() {
        let config = DatabaseConfig {
            url: "libsql://outbreaks.turso.io".into(),
            path: String::new(),
            ..Default::default()
        };
        assert!(config.is_remote());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = DatabaseConfig {
            connect_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
