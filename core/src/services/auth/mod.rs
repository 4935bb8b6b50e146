//! Authentication service module
//!
//! This module provides the token lifecycle:
//! - User registration and login
//! - Refresh token rotation
//! - Logout (revocation of every refresh token of a user)

mod hasher;
mod service;

#[cfg(test)]
mod tests;

pub use hasher::CredentialHasher;
pub use service::AuthService;
