//! Database module - SQLite implementations using SQLx
//!
//! This module provides:
//! - Connection pool management
//! - Embedded schema migrations
//! - Repository implementations for users and refresh tokens

pub mod connection;
pub mod sqlite;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use sqlite::{SqliteTokenRepository, SqliteUserRepository};

use chrono::{DateTime, TimeZone, Utc};
use gk_core::errors::DomainError;

/// Timestamps are stored as unix milliseconds so that SQL comparisons are numeric
pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(millis: i64) -> Result<DateTime<Utc>, DomainError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| DomainError::Internal {
            message: format!("Invalid stored timestamp: {}", millis),
        })
}

/// Whether a driver error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
