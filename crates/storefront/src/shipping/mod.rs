//! Shipping provider integration.
//!
//! One aggregator API covers everything the storefront needs from a
//! carrier: serviceability by pincode, carrier order creation, AWB
//! (tracking number) assignment, and pickup-location listing.
//!
//! # Modules
//!
//! - [`client`] - HTTP client with token auth and error mapping
//! - [`types`] - explicit request/response schemas for every endpoint
//! - [`serviceability`] - cached deliverability checks
//! - [`shipment`] - pickup-location worklist and shipment creation
//!
//! The [`ShippingProvider`] trait is the seam the serviceability checker
//! and shipment creator are generic over, so both run against scripted
//! fakes in tests.

pub mod client;
pub mod serviceability;
pub mod shipment;
pub mod types;

pub use client::ShippingClient;
pub use serviceability::{ServiceabilityChecker, ServiceabilityResult};
pub use shipment::{
    PENDING_SHIPMENT, PickupQueue, ShipmentCreator, ShipmentOutcome, ShipmentRequest,
    TrackingAssignment,
};
pub use types::{
    AssignAwbResponse, CarrierOrderItem, CarrierOrderResponse, CreateCarrierOrderRequest,
    PickupLocation, ServiceabilityResponse,
};

use async_trait::async_trait;
use thiserror::Error;

use spotfit_core::Pincode;

/// Errors that can occur when calling the shipping provider.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the API token (HTTP 401).
    #[error("invalid API token")]
    InvalidToken,

    /// Provider denied access for this account (HTTP 403).
    #[error("API access denied")]
    AccessDenied,

    /// Rate limited by the provider.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Provider returned an error response.
    ///
    /// `available_locations` carries pickup-location names the provider
    /// listed in the error payload, when it did; the shipment creator
    /// feeds them back into its worklist.
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        available_locations: Vec<String>,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

/// The provider operations the storefront depends on.
///
/// Implemented by [`ShippingClient`] in production and by scripted fakes
/// in tests.
#[async_trait]
pub trait ShippingProvider: Send + Sync {
    /// Is the pincode deliverable?
    async fn check_pincode(
        &self,
        pincode: &Pincode,
    ) -> Result<ServiceabilityResponse, ShippingError>;

    /// Pickup locations registered with the provider.
    async fn pickup_locations(&self) -> Result<Vec<PickupLocation>, ShippingError>;

    /// Create a carrier order from a pickup location.
    async fn create_order(
        &self,
        request: &CreateCarrierOrderRequest,
    ) -> Result<CarrierOrderResponse, ShippingError>;

    /// Assign an AWB (tracking number) to a created shipment.
    async fn assign_awb(
        &self,
        shipment_id: i64,
        courier_id: Option<i64>,
    ) -> Result<AssignAwbResponse, ShippingError>;
}

/// Forward the seam through a shared handle so a provider can be held
/// behind `Arc` (e.g. a test keeping an inspection handle while the
/// serviceability checker and shipment creator own their copies).
#[async_trait]
impl<T: ShippingProvider + ?Sized> ShippingProvider for std::sync::Arc<T> {
    async fn check_pincode(
        &self,
        pincode: &Pincode,
    ) -> Result<ServiceabilityResponse, ShippingError> {
        (**self).check_pincode(pincode).await
    }

    async fn pickup_locations(&self) -> Result<Vec<PickupLocation>, ShippingError> {
        (**self).pickup_locations().await
    }

    async fn create_order(
        &self,
        request: &CreateCarrierOrderRequest,
    ) -> Result<CarrierOrderResponse, ShippingError> {
        (**self).create_order(request).await
    }

    async fn assign_awb(
        &self,
        shipment_id: i64,
        courier_id: Option<i64>,
    ) -> Result<AssignAwbResponse, ShippingError> {
        (**self).assign_awb(shipment_id, courier_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ShippingError::InvalidToken.to_string(), "invalid API token");
        assert_eq!(
            ShippingError::AccessDenied.to_string(),
            "API access denied"
        );

        let err = ShippingError::Api {
            status: 422,
            message: "Wrong Pickup location entered".to_owned(),
            available_locations: vec!["Primary".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "API error: 422 - Wrong Pickup location entered"
        );
    }
}
