//! Data models for the storefront.

pub mod session;

pub use session::{CurrentUser, session_keys};
