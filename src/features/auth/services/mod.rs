mod auth_service;
pub mod password;
mod token_service;

pub use auth_service::{normalize_email, AuthService};
pub use token_service::TokenService;
