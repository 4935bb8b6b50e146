//! Shared configuration and common types for the Gatekeep server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types and environment loaders
//! - Error response envelope returned by the API

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CleanupConfig, ConfigError, DatabaseConfig, JwtConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
