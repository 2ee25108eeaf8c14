//! Backend order API: payment orders, verification, persistence.
//!
//! Request/response shapes match the backend's payment and order routes.
//! Payment endpoints speak snake_case (they mirror the gateway), order
//! persistence speaks camelCase (it mirrors the backend's document
//! schema); the serde renames below are the source of truth for both.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use spotfit_core::{Address, CartItem, Email, Money, OrderId, OrderStatus, PaymentId, PaymentStatus, UserId};

use crate::config::BackendApiConfig;

use super::{ApiError, error_for_response};

// =============================================================================
// Request / Response Schemas
// =============================================================================

/// Body for `POST payment/create-order`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentOrderRequest {
    /// Amount in paise.
    pub amount: i64,
    /// ISO currency code (always "INR").
    pub currency: String,
    /// Receipt nonce, unique per attempt.
    pub receipt: String,
    /// Cart snapshot at the time of the attempt.
    pub items: Vec<CartItem>,
    /// Selected shipping address.
    pub address: Address,
}

/// A payment order minted by the gateway via the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentOrder {
    /// Gateway order handle, passed to the checkout widget.
    pub id: OrderId,
    /// Amount in paise, echoed back by the gateway.
    pub amount: i64,
    /// Currency code, echoed back by the gateway.
    pub currency: String,
}

/// Body for `POST payment/verify-payment`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentRequest {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    /// Gateway HMAC signature over (order id, payment id).
    pub signature: String,
    pub cart_items: Vec<CartItem>,
    pub address: Address,
}

/// Verification verdict from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Customer block of an order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: Email,
    pub phone: String,
}

/// Shipping address snapshot in the backend's camelCase shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderShippingAddress {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub phone: String,
}

impl From<&Address> for OrderShippingAddress {
    fn from(address: &Address) -> Self {
        Self {
            full_name: address.full_name.clone(),
            address_line1: address.address_line1.clone(),
            address_line2: address.address_line2.clone().unwrap_or_default(),
            city: address.city.clone(),
            state: address.state.clone(),
            pincode: address.pincode.clone(),
            country: address.country.clone(),
            phone: address.phone.clone(),
        }
    }
}

/// One line item of an order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: spotfit_core::ProductId,
    pub title: String,
    /// List price before discount.
    pub price: Money,
    /// Unit price after discount (the price actually charged).
    pub discounted_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&CartItem> for OrderLineItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            title: item.product.title.clone(),
            price: item.product.price,
            discounted_price: item.unit_price(),
            quantity: item.quantity,
            size: item.size.clone(),
            image_url: item.product.display_image().map(str::to_owned),
        }
    }
}

/// Body for `POST orders/create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    /// Order total in rupees.
    pub amount: Money,
    pub currency: String,
    pub customer: OrderCustomer,
    pub shipping_address: OrderShippingAddress,
    pub items: Vec<OrderLineItem>,
}

/// Body for `POST orders/update-shipment`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentUpdate {
    pub order_id: OrderId,
    /// Tracking value: an AWB, a carrier shipment reference, or the
    /// pending-shipment sentinel.
    pub waybill: String,
    pub courier: String,
    pub status: String,
}

/// An order as returned by the order-history endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrder {
    pub order_id: OrderId,
    pub items: Vec<OrderLineItem>,
    pub total_amount: Money,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waybill_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
struct UserOrdersEnvelope {
    success: bool,
    data: UserOrdersData,
}

#[derive(Debug, Deserialize)]
struct UserOrdersData {
    orders: Vec<UserOrder>,
}

// =============================================================================
// OrderBackend Seam
// =============================================================================

/// The backend operations the checkout orchestrator depends on.
///
/// Implemented by [`OrderApiClient`] in production and by in-memory fakes
/// in tests.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Create a gateway payment order server-side.
    async fn create_payment_order(
        &self,
        request: &CreatePaymentOrderRequest,
    ) -> Result<PaymentOrder, ApiError>;

    /// Verify a completed payment's signature server-side.
    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerificationOutcome, ApiError>;

    /// Persist a paid order.
    async fn create_order(&self, order: &OrderRecord) -> Result<(), ApiError>;

    /// Record the shipment tracking value on an existing order.
    async fn update_shipment(&self, update: &ShipmentUpdate) -> Result<(), ApiError>;
}

/// Forward the seam through a shared handle so collaborators can be held
/// behind `Arc` (e.g. a test keeping an inspection handle while the
/// orchestrator owns its copy).
#[async_trait]
impl<T: OrderBackend + ?Sized> OrderBackend for std::sync::Arc<T> {
    async fn create_payment_order(
        &self,
        request: &CreatePaymentOrderRequest,
    ) -> Result<PaymentOrder, ApiError> {
        (**self).create_payment_order(request).await
    }

    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerificationOutcome, ApiError> {
        (**self).verify_payment(request).await
    }

    async fn create_order(&self, order: &OrderRecord) -> Result<(), ApiError> {
        (**self).create_order(order).await
    }

    async fn update_shipment(&self, update: &ShipmentUpdate) -> Result<(), ApiError> {
        (**self).update_shipment(update).await
    }
}

// =============================================================================
// OrderApiClient
// =============================================================================

/// HTTP client for the backend order API.
#[derive(Clone)]
pub struct OrderApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrderApiClient {
    /// Create a new order API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}/{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// List a user's orders by email.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn user_orders(&self, email: &Email) -> Result<Vec<UserOrder>, ApiError> {
        let url = format!(
            "{}/orders/user/{}",
            self.base_url,
            urlencoding::encode(email.as_str())
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let envelope: UserOrdersEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if !envelope.success {
            return Err(ApiError::Api {
                status: 200,
                message: "order listing reported failure".to_owned(),
            });
        }

        Ok(envelope.data.orders)
    }
}

#[async_trait]
impl OrderBackend for OrderApiClient {
    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn create_payment_order(
        &self,
        request: &CreatePaymentOrderRequest,
    ) -> Result<PaymentOrder, ApiError> {
        self.post_json("payment/create-order", request).await
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerificationOutcome, ApiError> {
        self.post_json("payment/verify-payment", request).await
    }

    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn create_order(&self, order: &OrderRecord) -> Result<(), ApiError> {
        // Response body is the stored document; we only care that it landed.
        let _: serde_json::Value = self.post_json("orders/create", order).await?;
        Ok(())
    }

    #[instrument(skip(self, update), fields(order_id = %update.order_id))]
    async fn update_shipment(&self, update: &ShipmentUpdate) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post_json("orders/update-shipment", update).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_record_serializes_camel_case() {
        let record = OrderRecord {
            order_id: OrderId::new("order_1"),
            payment_id: PaymentId::new("pay_1"),
            amount: Money::from_rupees(900),
            currency: "INR".to_owned(),
            customer: OrderCustomer {
                user_id: Some(UserId::new("user_1")),
                name: "Asha Verma".to_owned(),
                email: Email::parse("asha@example.com").unwrap(),
                phone: "9137532150".to_owned(),
            },
            shipping_address: OrderShippingAddress {
                full_name: "Asha Verma".to_owned(),
                address_line1: "B-2/79".to_owned(),
                address_line2: String::new(),
                city: "Delhi".to_owned(),
                state: "Delhi".to_owned(),
                pincode: "110089".to_owned(),
                country: "India".to_owned(),
                phone: "9137532150".to_owned(),
            },
            items: vec![],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["orderId"], "order_1");
        assert_eq!(json["customer"]["userId"], "user_1");
        assert_eq!(json["shippingAddress"]["fullName"], "Asha Verma");
    }

    #[test]
    fn test_verify_request_serializes_snake_case() {
        let request = VerifyPaymentRequest {
            order_id: OrderId::new("order_1"),
            payment_id: PaymentId::new("pay_1"),
            signature: "sig".to_owned(),
            cart_items: vec![],
            address: sample_address(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("order_id").is_some());
        assert!(json.get("payment_id").is_some());
        assert!(json.get("orderId").is_none());
    }

    #[test]
    fn test_user_order_tolerates_missing_optionals() {
        let json = r#"{"orderId":"order_1","items":[],"totalAmount":"900"}"#;
        let order: UserOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.waybill_number.is_none());
    }

    fn sample_address() -> Address {
        Address {
            id: spotfit_core::AddressId::new("addr_1"),
            full_name: "Asha Verma".to_owned(),
            phone: "9137532150".to_owned(),
            address_line1: "B-2/79".to_owned(),
            address_line2: None,
            city: "Delhi".to_owned(),
            state: "Delhi".to_owned(),
            pincode: "110089".to_owned(),
            country: "India".to_owned(),
            is_default: true,
            kind: spotfit_core::AddressKind::Home,
        }
    }
}
