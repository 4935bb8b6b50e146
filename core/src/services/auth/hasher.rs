//! Credential hashing seam for the authentication service

use crate::errors::DomainError;

/// One-way password hashing
///
/// Implementations are synchronous and may be CPU heavy; the service runs
/// them on the blocking thread pool.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
