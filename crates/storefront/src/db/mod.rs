//! Database operations for storefront `PostgreSQL`.
//!
//! The storefront keeps almost nothing locally - the backend API owns
//! products, orders, and users. `PostgreSQL` exists solely to back
//! tower-sessions, which in turn holds each customer's cart, addresses,
//! and selected address as JSON under fixed keys.
//!
//! The session table is created via:
//! ```bash
//! cargo run -p spotfit-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
