//! bcrypt implementation of the CredentialHasher trait

use bcrypt::{hash, verify, DEFAULT_COST};

use gk_core::errors::DomainError;
use gk_core::services::CredentialHasher;

/// Password hasher backed by bcrypt
#[derive(Debug, Clone)]
pub struct BcryptCredentialHasher {
    cost: u32,
}

impl BcryptCredentialHasher {
    /// Hasher with bcrypt's default cost
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Hasher with an explicit cost factor
    ///
    /// Low costs are only suitable for tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptCredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for BcryptCredentialHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        hash(password, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        verify(password, hash).map_err(|e| DomainError::Internal {
            message: format!("Failed to verify password: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = BcryptCredentialHasher::with_cost(4);
        let hashed = hasher.hash("secret12").unwrap();

        assert_ne!(hashed, "secret12");
        assert!(hasher.verify("secret12", &hashed).unwrap());
        assert!(!hasher.verify("secret13", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = BcryptCredentialHasher::with_cost(4);
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let hasher = BcryptCredentialHasher::with_cost(4);
        assert!(hasher.verify("secret12", "not-a-bcrypt-hash").is_err());
    }
}
