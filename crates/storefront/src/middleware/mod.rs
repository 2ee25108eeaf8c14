//! Middleware for the storefront.

pub mod auth;
pub mod session;

pub use auth::{AdminUser, AuthUser};
pub use session::create_session_layer;
