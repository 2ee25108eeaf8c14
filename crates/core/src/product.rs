//! Product model as served by the backend catalog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// A catalog product.
///
/// The backend is the source of truth; cart lines hold a snapshot of this
/// struct taken at add-to-cart time so totals stay stable even if the
/// catalog changes mid-session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Backend-assigned product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// List price in rupees, before discount.
    pub price: Money,
    /// Discount percentage (0-100).
    #[serde(default)]
    pub discount: u8,
    /// Units in stock. Cart quantities are clamped to this.
    pub quantity: u32,
    /// Available sizes (e.g. "S", "M", "L"); empty for one-size products.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Primary image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Additional image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Catalog category (e.g. "t-shirts", "joggers").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Marketing feature bullets.
    #[serde(default)]
    pub features: Vec<String>,
    /// Shown on the featured rail.
    #[serde(default)]
    pub featured: bool,
    /// Shown in the hero banner rotation.
    #[serde(default)]
    pub hero_banner: bool,
    /// Position within the hero banner rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_order: Option<u32>,
    /// Average customer rating (1-5), if any ratings exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Unit price after applying the product's discount (floored to whole
    /// rupees).
    #[must_use]
    pub fn discounted_price(&self) -> Money {
        self.price.discounted(self.discount)
    }

    /// Whether at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// The image to show for this product, preferring the primary URL.
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or_else(|| self.images.first().map(String::as_str))
    }
}
