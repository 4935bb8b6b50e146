//! Request and response bodies

pub mod auth_dto;

pub use auth_dto::{
    AuthResponse, LoginRequest, LogoutResponse, RefreshTokenRequest, RegisterRequest,
    UserResponse,
};
