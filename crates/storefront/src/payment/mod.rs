//! Payment gateway support.
//!
//! The gateway's checkout widget runs in the customer's browser; the
//! server side of the integration is (a) keeping the merchant key
//! available ([`MerchantKeys`]) and (b) producing the widget construction
//! payload ([`CheckoutOptions`]). Order creation and signature
//! verification go through the backend order API, which holds the gateway
//! secret.

pub mod keys;
pub mod types;

pub use keys::MerchantKeys;
pub use types::{CheckoutOptions, OrderItemNote, Prefill, STORE_NAME, Theme};

use thiserror::Error;

/// Errors from the payment configuration layer.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No merchant key could be obtained from the config endpoint or the
    /// environment fallback.
    #[error("payment configuration unavailable")]
    ConfigUnavailable,

    /// HTTP request to the config endpoint failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
