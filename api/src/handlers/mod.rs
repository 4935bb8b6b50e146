pub mod error_handler;

pub use error_handler::{handle_domain_error, json_error_handler, validation_error, ApiError};
