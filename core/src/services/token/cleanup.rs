//! Token cleanup service for periodic removal of expired refresh tokens
//!
//! Expired rows are already rejected at refresh time; this task only keeps the
//! table from growing without bound.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gk_shared::CleanupConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::errors::DomainError;
use crate::repositories::TokenRepository;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup
    pub interval: Duration,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60),
            enabled: true,
        }
    }
}

impl From<&CleanupConfig> for TokenCleanupConfig {
    fn from(config: &CleanupConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_seconds),
            enabled: config.enabled,
        }
    }
}

/// Background reclaimer for expired refresh tokens
pub struct TokenCleanupService<R: TokenRepository + 'static> {
    repository: Arc<R>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(repository: Arc<R>, config: TokenCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Number of rows removed
    /// * `Err(DomainError)` - The store rejected the delete
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        let started = Instant::now();
        let expired_tokens_deleted = self.repository.delete_expired_tokens(Utc::now()).await?;

        let result = CleanupResult {
            expired_tokens_deleted,
            duration: started.elapsed(),
        };
        info!(
            deleted = result.expired_tokens_deleted,
            elapsed_ms = result.duration.as_millis() as u64,
            "Token cleanup completed"
        );
        Ok(result)
    }

    /// Start the cleanup loop as a background task
    ///
    /// The first cycle runs one full interval after start. The loop exits as
    /// soon as `shutdown` flips to `true` or its sender is dropped. Returns
    /// `None` when cleanup is disabled.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let period = self.config.interval;
        if period.is_zero() {
            warn!("Token cleanup interval is zero, not starting");
            return None;
        }

        let handle = tokio::spawn(async move {
            info!(
                interval_secs = period.as_secs(),
                "Token cleanup service started"
            );

            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!(error = %e, "Token cleanup cycle failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("Token cleanup service stopped");
        });

        Some(handle)
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub expired_tokens_deleted: usize,
    /// Time spent in the store
    pub duration: Duration,
}
