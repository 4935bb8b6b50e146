//! HTTP surface of the token lifecycle service.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
