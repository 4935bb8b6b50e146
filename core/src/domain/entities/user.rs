//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered user
///
/// The credential hash is opaque to the domain and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned numeric identifier
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique email address
    pub email: String,

    /// One-way credential hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Timestamp when the user was created
    #[serde(skip_serializing, default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    #[serde(skip_serializing, default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// A user that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Creates a new unsaved user
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Attaches the store-assigned id, producing the persisted entity
    pub fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_omits_credential_hash() {
        let user = NewUser::new("Ann", "ann@x.com", "$2b$12$secret").into_user(7, Utc::now());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "ann@x.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_into_user_sets_timestamps() {
        let now = Utc::now();
        let user = NewUser::new("Ann", "ann@x.com", "hash").into_user(1, now);
        assert_eq!(user.created_at, now);
        assert_eq!(user.updated_at, now);
    }
}
