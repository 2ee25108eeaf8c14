//! Backend catalog API client.
//!
//! Listings are cached for 5 minutes (moka); the cache is invalidated when
//! an admin adds a product.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use spotfit_core::{Money, Product};
use tracing::{debug, instrument};

use crate::config::BackendApiConfig;

use super::{ApiError, error_for_response};

const CACHE_TTL_SECS: u64 = 300; // 5 minutes
const ALL_PRODUCTS_KEY: &str = "products";
const HERO_BANNERS_KEY: &str = "products:hero";

/// Fields for an admin-entered product.
///
/// Sent as multipart form data so image uploads ride along with the
/// scalar fields, matching the backend's product route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub discount: u8,
    pub quantity: u32,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub hero_banner: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_order: Option<u32>,
    /// Used when no image files are uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// An uploaded product image.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for the backend catalog API.
#[derive(Clone)]
pub struct ProductClient {
    inner: Arc<ProductClientInner>,
}

struct ProductClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, Vec<Product>>,
}

impl ProductClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .build();

        Ok(Self {
            inner: Arc::new(ProductClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                cache,
            }),
        })
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Product>, ApiError> {
        let url = format!("{}/{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Get the full product listing.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.cache.get(ALL_PRODUCTS_KEY).await {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let products = self.fetch_list("products").await?;
        self.inner
            .cache
            .insert(ALL_PRODUCTS_KEY.to_owned(), products.clone())
            .await;
        Ok(products)
    }

    /// Get the hero-banner products.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn hero_banners(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.cache.get(HERO_BANNERS_KEY).await {
            debug!("Cache hit for hero banners");
            return Ok(products);
        }

        let products = self.fetch_list("products/banner/hero").await?;
        self.inner
            .cache
            .insert(HERO_BANNERS_KEY.to_owned(), products.clone())
            .await;
        Ok(products)
    }

    /// Create a product (admin only), forwarding image uploads as
    /// multipart parts.
    ///
    /// # Errors
    ///
    /// Returns error if the upload fails or the response cannot be parsed.
    #[instrument(skip(self, product, images), fields(title = %product.title, image_count = images.len()))]
    pub async fn add(
        &self,
        product: &NewProduct,
        images: Vec<ImageUpload>,
    ) -> Result<Product, ApiError> {
        let mut form = Form::new()
            .text("title", product.title.clone())
            .text("description", product.description.clone())
            .text("price", product.price.amount().to_string())
            .text("discount", product.discount.to_string())
            .text("quantity", product.quantity.to_string())
            .text("featured", product.featured.to_string())
            .text("heroBanner", product.hero_banner.to_string());

        if let Some(category) = &product.category {
            form = form.text("category", category.clone());
        }
        if let Some(product_type) = &product.product_type {
            form = form.text("type", product_type.clone());
        }
        if let Some(order) = product.banner_order {
            form = form.text("bannerOrder", order.to_string());
        }

        // Arrays are stringified for the backend's form parser
        form = form
            .text(
                "sizes",
                serde_json::to_string(&product.sizes).map_err(|e| ApiError::Parse(e.to_string()))?,
            )
            .text(
                "features",
                serde_json::to_string(&product.features)
                    .map_err(|e| ApiError::Parse(e.to_string()))?,
            );

        if images.is_empty() {
            if let Some(image_url) = &product.image_url {
                form = form.text("imageUrl", image_url.clone());
            }
        } else {
            for image in images {
                let part = Part::bytes(image.bytes)
                    .file_name(image.file_name)
                    .mime_str(&image.content_type)
                    .map_err(|e| ApiError::Parse(e.to_string()))?;
                form = form.part("images", part);
            }
        }

        let url = format!("{}/products", self.inner.base_url);
        let response = self.inner.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let created: Product = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        // Listings are stale now
        self.inner.cache.invalidate_all();

        Ok(created)
    }
}
