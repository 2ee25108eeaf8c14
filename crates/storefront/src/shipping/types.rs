//! Shipping provider request/response schemas.
//!
//! Field names match the provider's wire format (snake_case, flattened
//! billing fields). Everything crossing the boundary is deserialized into
//! these structs - no raw JSON escapes this module.

use serde::{Deserialize, Serialize};

/// Response from the serviceability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceabilityResponse {
    /// Whether any courier delivers to the pincode.
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A pickup location registered with the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickupLocation {
    /// Registered location name; this string keys carrier orders.
    pub pickup_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Envelope around the pickup-location listing.
#[derive(Debug, Deserialize)]
pub(crate) struct PickupLocationListing {
    #[serde(default)]
    pub data: Vec<PickupLocation>,
}

/// One line of a carrier order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarrierOrderItem {
    pub name: String,
    pub sku: String,
    pub units: u32,
    /// Per-unit selling price in rupees.
    pub selling_price: i64,
}

/// Body for the carrier order creation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateCarrierOrderRequest {
    /// Our order id (the gateway order handle).
    pub order_id: String,
    /// "YYYY-MM-DD HH:MM" in UTC.
    pub order_date: String,
    /// Pickup location name; must match a registered location exactly.
    pub pickup_location: String,
    pub billing_customer_name: String,
    #[serde(default)]
    pub billing_last_name: String,
    pub billing_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address_2: Option<String>,
    pub billing_city: String,
    pub billing_pincode: String,
    pub billing_state: String,
    pub billing_country: String,
    pub billing_email: String,
    pub billing_phone: String,
    /// Ship to the billing address.
    pub shipping_is_billing: bool,
    pub order_items: Vec<CarrierOrderItem>,
    /// "Prepaid" - the storefront has no cash-on-delivery flow.
    pub payment_method: String,
    /// Order subtotal in rupees.
    pub sub_total: i64,
    /// Package weight in kg.
    pub weight: f64,
}

/// Response from carrier order creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarrierOrderResponse {
    /// Provider-side order id.
    pub order_id: i64,
    /// Provider-side shipment id; used for AWB assignment and as the
    /// tracking fallback.
    pub shipment_id: i64,
    #[serde(default)]
    pub status: String,
    /// AWB, when the provider assigns one at creation time. Often empty.
    #[serde(default)]
    pub awb_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_company_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
}

/// Response from AWB assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignAwbResponse {
    #[serde(default)]
    pub awb_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// Error body the provider returns on rejected requests.
///
/// When a pickup location is wrong, `data.available_locations` lists the
/// valid names - the shipment creator's worklist feeds on this.
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct CarrierErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<CarrierErrorData>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct CarrierErrorData {
    #[serde(default)]
    pub available_locations: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_response_tolerates_empty_awb() {
        let json = r#"{"order_id":4321,"shipment_id":8765,"status":"NEW","awb_code":""}"#;
        let response: CarrierOrderResponse = serde_json::from_str(json).unwrap();
        assert!(response.awb_code.is_empty());
        assert_eq!(response.shipment_id, 8765);
    }

    #[test]
    fn test_error_body_extracts_available_locations() {
        let json = r#"{
            "message": "Wrong Pickup location entered.",
            "data": {"available_locations": ["Primary", "Rohini Warehouse"]}
        }"#;
        let body: CarrierErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(
            body.data.unwrap().available_locations,
            vec!["Primary", "Rohini Warehouse"]
        );
    }

    #[test]
    fn test_error_body_without_locations() {
        let json = r#"{"message": "Internal error"}"#;
        let body: CarrierErrorBody = serde_json::from_str(json).unwrap();
        assert!(body.data.is_none());
    }
}
