//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::api::{ApiError, AuthClient, OrderApiClient, ProductClient};
use crate::checkout::CheckoutOrchestrator;
use crate::config::StorefrontConfig;
use crate::payment::{MerchantKeys, PaymentError};
use crate::shipping::{ServiceabilityChecker, ShipmentCreator, ShippingClient, ShippingError};

/// The orchestrator as wired against the live collaborators.
pub type LiveCheckout = CheckoutOrchestrator<OrderApiClient, ShippingClient>;

/// Error building the application state.
#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("backend API client: {0}")]
    Api(#[from] ApiError),
    #[error("shipping client: {0}")]
    Shipping(#[from] ShippingError),
    #[error("payment keys: {0}")]
    Payment(#[from] PaymentError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like API clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    products: ProductClient,
    auth: AuthClient,
    orders: OrderApiClient,
    merchant_keys: MerchantKeys,
    checkout: LiveCheckout,
}

impl AppState {
    /// Create a new application state, wiring every client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if any HTTP client fails to build.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, AppStateError> {
        let backend = OrderApiClient::new(&config.backend)?;
        let products = ProductClient::new(&config.backend)?;
        let auth = AuthClient::new(&config.backend)?;

        let shipping = ShippingClient::new(&config.shipping)?;
        let merchant_keys = MerchantKeys::new(&config.backend, &config.payment)?;

        let checkout = CheckoutOrchestrator::new(
            backend.clone(),
            merchant_keys.clone(),
            ServiceabilityChecker::new(shipping.clone()),
            ShipmentCreator::new(shipping, config.shipping.pickup_locations.clone()),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                products,
                auth,
                orders: backend,
                merchant_keys,
                checkout,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn products(&self) -> &ProductClient {
        &self.inner.products
    }

    /// Get a reference to the auth client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the order API client (order history).
    #[must_use]
    pub fn orders(&self) -> &OrderApiClient {
        &self.inner.orders
    }

    /// Get a reference to the merchant key loader.
    #[must_use]
    pub fn merchant_keys(&self) -> &MerchantKeys {
        &self.inner.merchant_keys
    }

    /// Get a reference to the checkout orchestrator.
    #[must_use]
    pub fn checkout(&self) -> &LiveCheckout {
        &self.inner.checkout
    }
}
