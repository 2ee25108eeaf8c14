//! Checkout orchestration.
//!
//! The purchase flow is a strict sequence of gates and steps; see
//! [`CheckoutOrchestrator`]. Every error here is written for the customer
//! - the route layer sends the message through as-is.

pub mod orchestrator;

pub use orchestrator::{
    CheckoutOrchestrator, CheckoutOutcome, PaymentConfirmation, PaymentSession,
};

use axum::http::StatusCode;
use thiserror::Error;

use spotfit_core::AddressError;

use crate::api::ApiError;

/// A checkout precondition or step failed.
///
/// The display strings are the exact messages shown to the customer.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Gate 1: nobody is logged in. Carries the path to return to after
    /// login.
    #[error("Please login to continue with payment")]
    NotAuthenticated {
        /// Where to send the customer back to after logging in.
        return_to: String,
    },

    /// Gate 2: no address selected.
    #[error("Please add a delivery address before proceeding with payment")]
    MissingAddress,

    /// Gate 2: selected address is incomplete or has a bad pincode.
    #[error("Please complete your address details including valid 6-digit pincode")]
    InvalidAddress(#[source] AddressError),

    /// Gate 3: the address's pincode is not deliverable (or the provider
    /// could not confirm it is).
    #[error("Delivery is not available to this location. Please update your address.")]
    NotServiceable {
        /// Provider-level reason, for logging and support.
        reason: String,
    },

    /// Gate 4: nothing to buy.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Gate 5: no merchant key from the config endpoint, the one-shot
    /// reload, or the environment fallback.
    #[error("Payment system unavailable. Please try again later.")]
    PaymentUnavailable,

    /// Gate 6: the cart total cannot be expressed in paise.
    #[error("Order amount is invalid")]
    InvalidAmount,

    /// Gate 6: the backend refused to create the payment order.
    #[error("Payment initialization failed. Please try again.")]
    PaymentOrder(#[source] ApiError),

    /// Step 7: the backend could not be reached for verification.
    #[error("There was an issue verifying your payment. Please contact support.")]
    Verification(#[source] ApiError),

    /// Step 7: the backend rejected the payment signature. Terminal - no
    /// automatic retry.
    #[error("Payment verification failed. Please contact support.")]
    VerificationFailed,
}

impl CheckoutError {
    /// HTTP status for this failure.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::MissingAddress
            | Self::InvalidAddress(_)
            | Self::NotServiceable { .. }
            | Self::EmptyCart
            | Self::InvalidAmount => StatusCode::BAD_REQUEST,
            Self::PaymentUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::PaymentOrder(_) | Self::Verification(_) => StatusCode::BAD_GATEWAY,
            Self::VerificationFailed => StatusCode::PAYMENT_REQUIRED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_customer_facing() {
        assert_eq!(
            CheckoutError::EmptyCart.to_string(),
            "Your cart is empty"
        );
        assert_eq!(
            CheckoutError::NotAuthenticated {
                return_to: "/checkout".to_owned()
            }
            .to_string(),
            "Please login to continue with payment"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CheckoutError::NotAuthenticated {
                return_to: String::new()
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CheckoutError::EmptyCart.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CheckoutError::PaymentUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            CheckoutError::VerificationFailed.status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
    }
}
