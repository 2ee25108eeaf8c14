//! Cached pincode serviceability checks.

use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use spotfit_core::Pincode;

use super::{ShippingError, ShippingProvider};

/// How long a provider answer stays cached. Serviceability for a pincode
/// changes on the provider's timescale (days), not the session's.
const CACHE_TTL_SECS: u64 = 300;

/// Deliverability verdict for a pincode, with a customer-facing reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceabilityResult {
    pub is_serviceable: bool,
    pub message: String,
}

impl ServiceabilityResult {
    fn serviceable(message: &str) -> Self {
        Self {
            is_serviceable: true,
            message: message.to_owned(),
        }
    }

    fn not_serviceable(message: &str) -> Self {
        Self {
            is_serviceable: false,
            message: message.to_owned(),
        }
    }
}

/// Checks deliverability against the provider, caching per pincode.
///
/// Results are keyed by pincode only: re-selecting an address with the
/// same pincode reuses the cached verdict, and nothing but an address
/// change can produce a different key. Provider transport failures are
/// mapped to a conservative "not serviceable" verdict and are NOT cached,
/// so a recovered provider answers the next attempt.
pub struct ServiceabilityChecker<P> {
    provider: P,
    cache: Cache<String, ServiceabilityResult>,
}

impl<P: ShippingProvider> ServiceabilityChecker<P> {
    /// Create a checker around a provider.
    #[must_use]
    pub fn new(provider: P) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .build();

        Self { provider, cache }
    }

    /// Check deliverability for a raw pincode string.
    ///
    /// Input that is not exactly six digits yields `None` without any
    /// network call. Every other outcome - including provider failures -
    /// yields a verdict the customer can read.
    #[instrument(skip(self))]
    pub async fn check(&self, raw_pincode: &str) -> Option<ServiceabilityResult> {
        let Ok(pincode) = Pincode::parse(raw_pincode) else {
            debug!("pincode not checkable; skipping provider call");
            return None;
        };

        if let Some(hit) = self.cache.get(pincode.as_str()).await {
            debug!("cache hit for serviceability");
            return Some(hit);
        }

        let result = match self.provider.check_pincode(&pincode).await {
            Ok(response) if response.available => {
                ServiceabilityResult::serviceable("Delivery available to this location")
            }
            Ok(_) => ServiceabilityResult::not_serviceable(
                "Delivery not available to this pincode",
            ),
            Err(err) => return Some(Self::map_failure(&err)),
        };

        // Only provider-answered verdicts are cached
        self.cache
            .insert(pincode.into_inner(), result.clone())
            .await;

        Some(result)
    }

    /// Conservative closed-failure mapping: an unreachable or misbehaving
    /// provider never unblocks checkout.
    fn map_failure(err: &ShippingError) -> ServiceabilityResult {
        tracing::warn!(error = %err, "serviceability check failed");
        match err {
            ShippingError::InvalidToken => ServiceabilityResult::not_serviceable(
                "Invalid courier API token. Please check shipping configuration.",
            ),
            ShippingError::AccessDenied => ServiceabilityResult::not_serviceable(
                "Courier API access denied. Check shipping account permissions.",
            ),
            _ => ServiceabilityResult::not_serviceable("Unable to verify delivery availability"),
        }
    }
}
