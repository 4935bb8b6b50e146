//! Expired refresh token reclamation configuration

use serde::{Deserialize, Serialize};

use super::{parsed_var, ConfigError};

/// Configuration for the background refresh token reclaimer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to run the background task at all
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 24 * 60 * 60, // once a day
            enabled: true,
        }
    }
}

impl CleanupConfig {
    pub(crate) fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let interval_seconds =
            parsed_var(lookup, "TOKEN_CLEANUP_INTERVAL_SECS", defaults.interval_seconds)?;
        if interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_CLEANUP_INTERVAL_SECS".to_string(),
                message: "interval must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            interval_seconds,
            enabled: parsed_var(lookup, "TOKEN_CLEANUP_ENABLED", defaults.enabled)?,
        })
    }
}
