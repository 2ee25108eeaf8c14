//! Merchant key loading.
//!
//! The live merchant key comes from the backend config endpoint so it can
//! be rotated without a deploy. It is fetched asynchronously at startup;
//! if checkout arrives before the load finishes, [`MerchantKeys::ensure`]
//! performs one synchronous reload and then falls back to the
//! environment-level key before giving up.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::config::{BackendApiConfig, PaymentConfig};

use super::PaymentError;

/// Response from `GET payment/config`.
#[derive(Debug, Deserialize)]
struct PaymentConfigResponse {
    #[serde(rename = "keyId")]
    key_id: String,
}

/// Cached merchant key with async load and sync fallback.
#[derive(Clone)]
pub struct MerchantKeys {
    inner: Arc<MerchantKeysInner>,
}

struct MerchantKeysInner {
    client: reqwest::Client,
    config_url: String,
    fallback_key_id: Option<String>,
    /// In-memory key cache; `None` until the first successful load.
    key_id: RwLock<Option<String>>,
}

impl MerchantKeys {
    /// Create a new loader.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        backend: &BackendApiConfig,
        payment: &PaymentConfig,
    ) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            inner: Arc::new(MerchantKeysInner {
                client,
                config_url: format!(
                    "{}/payment/config",
                    backend.base_url.trim_end_matches('/')
                ),
                fallback_key_id: payment.fallback_key_id.clone(),
                key_id: RwLock::new(None),
            }),
        })
    }

    /// Kick off the startup load without blocking.
    pub fn spawn_initial_load(&self) {
        let keys = self.clone();
        tokio::spawn(async move {
            if let Err(err) = keys.load().await {
                tracing::warn!(error = %err, "initial merchant key load failed");
            }
        });
    }

    /// Fetch the merchant key from the config endpoint and cache it.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is unreachable or the response cannot
    /// be parsed.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), PaymentError> {
        let response = self
            .inner
            .client
            .get(&self.inner.config_url)
            .send()
            .await?
            .error_for_status()?;

        let config: PaymentConfigResponse = response.json().await?;
        *self.inner.key_id.write().await = Some(config.key_id);
        tracing::info!("merchant key loaded from config endpoint");
        Ok(())
    }

    /// The cached key, if the async load has completed.
    pub async fn key_id(&self) -> Option<String> {
        self.inner.key_id.read().await.clone()
    }

    /// Get a usable merchant key, loading late if necessary.
    ///
    /// Order of attempts: cached key, one synchronous reload, environment
    /// fallback. Exactly one reload - checkout must not hang on a dead
    /// config endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::ConfigUnavailable`] when every source is
    /// exhausted.
    #[instrument(skip(self))]
    pub async fn ensure(&self) -> Result<String, PaymentError> {
        if let Some(key) = self.key_id().await {
            return Ok(key);
        }

        if self.load().await.is_ok()
            && let Some(key) = self.key_id().await
        {
            return Ok(key);
        }

        if let Some(key) = &self.inner.fallback_key_id {
            tracing::warn!("config endpoint unavailable; using environment merchant key");
            return Ok(key.clone());
        }

        Err(PaymentError::ConfigUnavailable)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys_with(fallback: Option<&str>, config_url: &str) -> MerchantKeys {
        MerchantKeys::new(
            &BackendApiConfig {
                base_url: config_url.to_owned(),
            },
            &PaymentConfig {
                fallback_key_id: fallback.map(str::to_owned),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_uses_fallback_when_endpoint_unreachable() {
        // Port 9 (discard) refuses connections immediately.
        let keys = keys_with(Some("rzp_test_fallback"), "http://127.0.0.1:9/api");
        let key = keys.ensure().await.unwrap();
        assert_eq!(key, "rzp_test_fallback");
    }

    #[tokio::test]
    async fn test_ensure_fails_without_any_source() {
        let keys = keys_with(None, "http://127.0.0.1:9/api");
        assert!(matches!(
            keys.ensure().await,
            Err(PaymentError::ConfigUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_cached_key_wins_over_fallback() {
        let keys = keys_with(Some("rzp_test_fallback"), "http://127.0.0.1:9/api");
        *keys.inner.key_id.write().await = Some("rzp_live_loaded".to_owned());
        assert_eq!(keys.ensure().await.unwrap(), "rzp_live_loaded");
    }
}
