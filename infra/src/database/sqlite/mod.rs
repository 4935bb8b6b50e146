//! SQLite implementations of the repository traits

mod token_repository_impl;
mod user_repository_impl;

pub use token_repository_impl::SqliteTokenRepository;
pub use user_repository_impl::SqliteUserRepository;

use gk_core::errors::DomainError;
use sqlx::sqlite::SqliteRow;
use sqlx::{Decode, Row, Sqlite, Type};

/// Read a named column, reporting decode failures as internal errors
pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}
