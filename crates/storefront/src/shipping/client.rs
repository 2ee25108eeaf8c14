//! Shipping provider HTTP client.
//!
//! Token-authenticated JSON client. Auth failures map to distinct error
//! variants (401 vs 403) because the serviceability checker shows the
//! customer different messages for each.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use spotfit_core::Pincode;

use crate::config::ShippingConfig;

use super::types::{
    AssignAwbResponse, CarrierErrorBody, CarrierOrderResponse, CreateCarrierOrderRequest,
    PickupLocation, PickupLocationListing, ServiceabilityResponse,
};
use super::{ShippingError, ShippingProvider};

/// HTTP client for the shipping provider API.
#[derive(Clone)]
pub struct ShippingClient {
    inner: Arc<ShippingClientInner>,
}

struct ShippingClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: SecretString,
}

impl ShippingClient {
    /// Create a new shipping provider client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ShippingConfig) -> Result<Self, ShippingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(ShippingClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                api_token: config.api_token.clone(),
            }),
        })
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ShippingError> {
        let status = response.status();

        match status {
            reqwest::StatusCode::UNAUTHORIZED => return Err(ShippingError::InvalidToken),
            reqwest::StatusCode::FORBIDDEN => return Err(ShippingError::AccessDenied),
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                return Err(ShippingError::RateLimited(retry_after));
            }
            _ => {}
        }

        let body = response.text().await?;

        if !status.is_success() {
            // Error payloads sometimes carry the valid pickup-location
            // names; surface them for the worklist.
            let parsed: CarrierErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(ShippingError::Api {
                status: status.as_u16(),
                message: parsed
                    .message
                    .unwrap_or_else(|| body.chars().take(200).collect()),
                available_locations: parsed
                    .data
                    .map(|d| d.available_locations)
                    .unwrap_or_default(),
            });
        }

        serde_json::from_str(&body).map_err(|e| ShippingError::Parse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ShippingError> {
        let url = format!("{}/{path}", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(self.inner.api_token.expose_secret())
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ShippingError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}/{path}", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(self.inner.api_token.expose_secret())
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

#[async_trait]
impl ShippingProvider for ShippingClient {
    #[instrument(skip(self), fields(pincode = %pincode))]
    async fn check_pincode(
        &self,
        pincode: &Pincode,
    ) -> Result<ServiceabilityResponse, ShippingError> {
        self.get(&format!("courier/serviceability/{pincode}")).await
    }

    #[instrument(skip(self))]
    async fn pickup_locations(&self) -> Result<Vec<PickupLocation>, ShippingError> {
        let listing: PickupLocationListing = self.get("settings/company/pickup").await?;
        Ok(listing.data)
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id, pickup_location = %request.pickup_location))]
    async fn create_order(
        &self,
        request: &CreateCarrierOrderRequest,
    ) -> Result<CarrierOrderResponse, ShippingError> {
        self.post("orders/create/adhoc", request).await
    }

    #[instrument(skip(self))]
    async fn assign_awb(
        &self,
        shipment_id: i64,
        courier_id: Option<i64>,
    ) -> Result<AssignAwbResponse, ShippingError> {
        #[derive(Serialize)]
        struct AssignAwbRequest {
            shipment_id: i64,
            #[serde(skip_serializing_if = "Option::is_none")]
            courier_id: Option<i64>,
        }

        self.post(
            "courier/assign/awb",
            &AssignAwbRequest {
                shipment_id,
                courier_id,
            },
        )
        .await
    }
}
