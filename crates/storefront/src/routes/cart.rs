//! Cart route handlers.
//!
//! Each handler loads the session-persisted cart, applies one mutation
//! through the store (stock clamps included), saves it back, and returns
//! the fresh cart view.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use spotfit_core::{Cart, Money, Product, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::CartStore;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Money,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product.id.clone(),
                    title: item.product.title.clone(),
                    size: item.size.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price(),
                    line_total: item.line_total(),
                    image: item.product.display_image().map(str::to_owned),
                })
                .collect(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    /// Clear the cart first and add only this product.
    #[serde(default)]
    pub buy_now: bool,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    pub quantity: u32,
}

/// Remove request body (one unit or a whole line).
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
}

/// Item-count badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Look up a product in the catalog by ID.
async fn find_product(state: &AppState, product_id: &ProductId) -> Result<Product> {
    let products = state.products().get_all().await?;
    products
        .into_iter()
        .find(|p| p.id == *product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let store = CartStore::load(&session).await;
    Ok(Json(CartView::from(store.cart())))
}

/// Add one unit of a product (or buy-now).
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = find_product(&state, &request.product_id).await?;

    let mut store = CartStore::load(&session).await;
    if request.buy_now {
        store.buy_now(&product, request.size.as_deref())?;
    } else {
        store.add(&product, request.size.as_deref())?;
    }
    store.save(&session).await?;

    Ok(Json(CartView::from(store.cart())))
}

/// Set a line's quantity (clamped to stock; zero removes).
#[instrument(skip(session), fields(product_id = %request.product_id, quantity = request.quantity))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut store = CartStore::load(&session).await;

    if store
        .update_quantity(&request.product_id, request.size.as_deref(), request.quantity)
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "cart line for product {}",
            request.product_id
        )));
    }
    store.save(&session).await?;

    Ok(Json(CartView::from(store.cart())))
}

/// Remove one unit of a line.
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut store = CartStore::load(&session).await;
    store.remove(&request.product_id, request.size.as_deref());
    store.save(&session).await?;

    Ok(Json(CartView::from(store.cart())))
}

/// Delete a line entirely.
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn remove_line(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut store = CartStore::load(&session).await;
    store.remove_line(&request.product_id, request.size.as_deref());
    store.save(&session).await?;

    Ok(Json(CartView::from(store.cart())))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut store = CartStore::load(&session).await;
    store.clear();
    store.save(&session).await?;

    Ok(Json(CartView::from(store.cart())))
}

/// Item count for the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let store = CartStore::load(&session).await;
    Ok(Json(CartCount {
        count: store.item_count(),
    }))
}
