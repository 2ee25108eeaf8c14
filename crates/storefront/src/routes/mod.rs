//! HTTP route handlers for the storefront.
//!
//! All handlers speak JSON; the UI is a separate client of this service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (database)
//!
//! # Products
//! GET  /products                     - Product listing
//! GET  /products/banner/hero         - Hero banner products
//! POST /admin/products               - Product entry (admin, multipart)
//!
//! # Cart
//! GET  /cart                         - Cart contents and totals
//! POST /cart/add                     - Add one unit
//! POST /cart/update                  - Set a line quantity (clamped)
//! POST /cart/remove                  - Remove one unit
//! POST /cart/remove-line             - Delete a line
//! POST /cart/clear                   - Empty the cart
//! GET  /cart/count                   - Item count badge
//!
//! # Addresses
//! GET    /addresses                  - List + selected
//! POST   /addresses                  - Create (auto-selects first/default)
//! PUT    /addresses/{id}             - Update
//! DELETE /addresses/{id}             - Delete (reselects on fallback)
//! POST   /addresses/{id}/select      - Select
//!
//! # Checkout
//! GET  /checkout/serviceability      - Pincode deliverability probe
//! POST /checkout                     - Run gates, mint payment order
//! POST /checkout/confirm             - Verify payment, persist, ship
//!
//! # Auth
//! POST /auth/login                   - Login via backend
//! POST /auth/register                - Register via backend
//! POST /auth/logout                  - Clear session identity
//!
//! # Account
//! GET  /account/orders               - Order history (requires auth)
//! ```

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/banner/hero", get(products::hero_banners))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/remove-line", post(cart::remove_line))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route(
            "/{id}",
            axum::routing::put(addresses::update).delete(addresses::delete),
        )
        .route("/{id}/select", post(addresses::select))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::begin))
        .route("/confirm", post(checkout::confirm))
        .route("/serviceability", get(checkout::serviceability))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/admin/products", post(products::create))
        .nest("/cart", cart_routes())
        .nest("/addresses", address_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .route("/account/orders", get(orders::index))
}
