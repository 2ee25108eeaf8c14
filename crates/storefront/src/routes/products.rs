//! Product route handlers.
//!
//! Listings proxy the backend catalog (cached). Product entry is
//! admin-only and forwards multipart form data - scalar fields plus any
//! number of `images` parts - to the backend.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use tracing::instrument;

use spotfit_core::{Money, Product};

use crate::api::{ImageUpload, NewProduct};
use crate::error::{AppError, Result};
use crate::middleware::AdminUser;
use crate::state::AppState;

/// Product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.products().get_all().await?))
}

/// Hero banner products.
#[instrument(skip(state))]
pub async fn hero_banners(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.products().hero_banners().await?))
}

/// Create a product (admin only).
#[instrument(skip_all, fields(admin = %admin.0.email))]
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let (product, images) = parse_product_form(multipart).await?;
    let created = state.products().add(&product, images).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Parse the product-entry multipart form.
///
/// Array fields (`sizes`, `features`) arrive as JSON strings, matching
/// the backend's form contract.
async fn parse_product_form(
    mut multipart: Multipart,
) -> Result<(NewProduct, Vec<ImageUpload>)> {
    let mut product = NewProduct {
        title: String::new(),
        description: String::new(),
        price: Money::ZERO,
        discount: 0,
        quantity: 0,
        sizes: Vec::new(),
        features: Vec::new(),
        category: None,
        product_type: None,
        featured: false,
        hero_banner: false,
        banner_order: None,
        image_url: None,
    };
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        if name == "images" {
            let file_name = field.file_name().unwrap_or("upload").to_owned();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("invalid image upload: {e}")))?;
            images.push(ImageUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid field {name}: {e}")))?;

        match name.as_str() {
            "title" => product.title = value,
            "description" => product.description = value,
            "price" => {
                let amount: Decimal = value
                    .parse()
                    .map_err(|_| AppError::BadRequest("invalid price".to_owned()))?;
                product.price = Money::new(amount);
            }
            "discount" => {
                product.discount = value
                    .parse()
                    .map_err(|_| AppError::BadRequest("invalid discount".to_owned()))?;
            }
            "quantity" => {
                product.quantity = value
                    .parse()
                    .map_err(|_| AppError::BadRequest("invalid quantity".to_owned()))?;
            }
            "sizes" => {
                product.sizes = serde_json::from_str(&value)
                    .map_err(|_| AppError::BadRequest("invalid sizes".to_owned()))?;
            }
            "features" => {
                product.features = serde_json::from_str(&value)
                    .map_err(|_| AppError::BadRequest("invalid features".to_owned()))?;
            }
            "category" => product.category = Some(value),
            "type" => product.product_type = Some(value),
            "featured" => product.featured = value == "true",
            "heroBanner" => product.hero_banner = value == "true",
            "bannerOrder" => {
                product.banner_order = Some(
                    value
                        .parse()
                        .map_err(|_| AppError::BadRequest("invalid banner order".to_owned()))?,
                );
            }
            "imageUrl" => product.image_url = Some(value),
            _ => {} // Unknown fields are ignored, matching the backend
        }
    }

    if product.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_owned()));
    }

    Ok((product, images))
}
