//! Token service module for JWT management
//!
//! This module handles:
//! - Access token issuance and verification
//! - Refresh token issuance and signature checks
//! - Background cleanup of expired refresh tokens

mod cleanup;
mod config;
mod service;


pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use service::TokenService;
