//! # Infrastructure Layer
//!
//! Concrete implementations of the seams declared by `gk_core`:
//!
//! - **Database**: SQLite credential store using SQLx
//! - **Security**: bcrypt password hashing

/// Database module - SQLite implementations using SQLx
pub mod database;

/// Security module - password hashing
pub mod security;

pub use database::{DatabasePool, SqliteTokenRepository, SqliteUserRepository};
pub use security::BcryptCredentialHasher;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
