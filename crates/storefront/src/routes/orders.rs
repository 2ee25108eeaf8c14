//! Order history route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::api::UserOrder;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// The logged-in customer's orders.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<UserOrder>>> {
    let user =
        user.ok_or_else(|| AppError::Unauthorized("Please login to view your orders".to_owned()))?;

    let orders = state.orders().user_orders(&user.email).await?;
    Ok(Json(orders))
}
