//! Database configuration module

use serde::{Deserialize, Serialize};

use super::{parsed_var, ConfigError};

/// SQLite store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite://path` or `sqlite::memory:`)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Slow query threshold in milliseconds
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("sqlite://auth.db"),
            max_connections: 5,
            connect_timeout: 30,
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl DatabaseConfig {
    pub(crate) fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => lookup("DATABASE_PATH")
                .map(|path| Self::url_for_path(&path))
                .unwrap_or(defaults.url),
        };

        Ok(Self {
            url,
            max_connections: parsed_var(lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            connect_timeout: parsed_var(lookup, "DATABASE_CONNECT_TIMEOUT", defaults.connect_timeout)?,
            slow_query_threshold: defaults.slow_query_threshold,
        })
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Configuration for a private in-memory database
    ///
    /// Every pooled SQLite connection to `:memory:` opens its own database,
    /// so the pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            max_connections: 1,
            ..Default::default()
        }
    }

    /// Check if this configuration points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }

    fn url_for_path(path: &str) -> String {
        if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite://{}", path)
        }
    }
}

fn default_slow_query_threshold() -> u64 {
    1000 // 1 second
}
