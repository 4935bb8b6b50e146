//! Session guard for protected operations

mod guard;

pub use guard::{extract_bearer_token, SessionGuard};
