//! Backend REST API clients.
//!
//! The backend API owns users, the catalog, and orders; the storefront
//! talks to it over JSON/HTTPS. Every response is deserialized into an
//! explicit schema at this boundary - nothing downstream touches raw
//! JSON.
//!
//! # Clients
//!
//! - [`OrderApiClient`] - payment orders, verification, order persistence
//! - [`ProductClient`] - catalog listings (cached) and admin product entry
//! - [`AuthClient`] - login/register proxy
//!
//! The [`OrderBackend`] trait is the seam the checkout orchestrator is
//! generic over, so the full purchase flow runs against in-memory fakes in
//! tests.

pub mod auth;
pub mod orders;
pub mod products;

pub use auth::{AuthClient, AuthSession, BackendUser, RegisterRequest};
pub use orders::{
    CreatePaymentOrderRequest, OrderApiClient, OrderBackend, OrderCustomer, OrderLineItem,
    OrderRecord, PaymentOrder, ShipmentUpdate, UserOrder, VerificationOutcome,
    VerifyPaymentRequest,
};
pub use products::{ImageUpload, NewProduct, ProductClient};

use thiserror::Error;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Read a non-success response into [`ApiError::Api`], truncating the body.
pub(crate) async fn error_for_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(500)
        .collect();
    ApiError::Api { status, message }
}
