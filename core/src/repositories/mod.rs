//! Repository traits describing the credential store.
//!
//! The core only depends on these traits; the SQLite implementation lives in
//! the infrastructure crate and in-memory doubles back the unit tests.

pub mod token;
pub mod user;

pub use token::TokenRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use token::MockTokenRepository;
#[cfg(test)]
pub use user::MockUserRepository;
