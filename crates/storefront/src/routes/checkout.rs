//! Checkout route handlers.
//!
//! `begin` and `confirm` bracket the browser-side gateway widget. The
//! login redirect for unauthenticated checkouts carries the return path,
//! so the customer lands back on checkout after signing in.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::{CheckoutError, CheckoutOutcome, PaymentConfirmation, PaymentSession};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::shipping::ServiceabilityResult;
use crate::state::AppState;
use crate::store::{AddressBook, CartStore};

/// Path the customer returns to after logging in mid-checkout.
const CHECKOUT_RETURN_PATH: &str = "/checkout";

/// Query for the serviceability probe.
#[derive(Debug, Deserialize)]
pub struct ServiceabilityQuery {
    pub pincode: String,
}

/// Serviceability probe response; `result` is null for unchecked input
/// (pincode not exactly six digits).
#[derive(Debug, Serialize)]
pub struct ServiceabilityView {
    pub result: Option<ServiceabilityResult>,
}

/// Probe deliverability for a pincode (used as the address form updates).
#[instrument(skip(state), fields(pincode = %query.pincode))]
pub async fn serviceability(
    State(state): State<AppState>,
    Query(query): Query<ServiceabilityQuery>,
) -> Result<Json<ServiceabilityView>> {
    let result = state
        .checkout()
        .serviceability()
        .check(&query.pincode)
        .await;
    Ok(Json(ServiceabilityView { result }))
}

/// Run the checkout gates and mint a payment order.
///
/// Success returns the gateway widget payload. An unauthenticated
/// customer is redirected to login with a `returnUrl` back to checkout.
#[instrument(skip_all)]
pub async fn begin(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    session: Session,
) -> std::result::Result<Json<PaymentSession>, Response> {
    let book = AddressBook::load(&session).await;
    let cart = CartStore::load(&session).await;

    match state
        .checkout()
        .begin(user.as_ref(), &book, cart.cart(), CHECKOUT_RETURN_PATH)
        .await
    {
        Ok(payment_session) => Ok(Json(payment_session)),
        Err(CheckoutError::NotAuthenticated { return_to }) => {
            let login = format!("/auth/login?returnUrl={}", urlencoding::encode(&return_to));
            Err(Redirect::to(&login).into_response())
        }
        Err(err) => Err(AppError::from(err).into_response()),
    }
}

/// Verify the payment, persist the order, create the shipment, and clear
/// the cart.
#[instrument(skip_all)]
pub async fn confirm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    session: Session,
    Json(confirmation): Json<PaymentConfirmation>,
) -> Result<Json<CheckoutOutcome>> {
    let user = user.ok_or_else(|| {
        AppError::Unauthorized("login expired during payment".to_owned())
    })?;

    let book = AddressBook::load(&session).await;
    let mut cart = CartStore::load(&session).await;

    let outcome = state
        .checkout()
        .complete(&confirmation, &user, &book, cart.cart())
        .await?;

    // Order is paid and recorded; the cart is done
    cart.clear();
    cart.save(&session).await?;

    Ok(Json(outcome))
}
