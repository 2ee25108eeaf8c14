//! Configuration validation.

use spotfit_storefront::config::{ConfigError, StorefrontConfig};

/// Load the configuration and report what was found.
///
/// Secrets are validated (length, placeholder patterns, entropy) exactly
/// as the server does at startup; the redacted debug output never prints
/// them.
///
/// # Errors
///
/// Returns the first `ConfigError` the loader hits.
pub fn run() -> Result<(), ConfigError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!(bind = %config.socket_addr(), "configuration is valid");
    tracing::info!(backend = %config.backend.base_url, "backend API");
    tracing::info!(shipping = ?config.shipping, "shipping provider");
    tracing::info!(
        pickup_fallbacks = config.shipping.pickup_locations.len(),
        sentry = config.sentry_dsn.is_some(),
        payment_fallback_key = config.payment.fallback_key_id.is_some(),
        "collaborators"
    );

    Ok(())
}
