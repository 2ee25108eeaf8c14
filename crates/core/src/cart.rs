//! Cart lines, stock-clamped mutations, and totals.
//!
//! This is the pure cart calculus: no persistence, no notifications. The
//! storefront wraps it in a session-backed store that saves after every
//! mutation and broadcasts snapshots to subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Money, ProductId};

/// Why a cart mutation was refused.
///
/// A refused mutation leaves the cart exactly as it was.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product has no stock at all.
    #[error("{title} is out of stock")]
    OutOfStock {
        /// Product title, for the user-facing message.
        title: String,
    },
    /// Adding one more would exceed the available stock.
    #[error("only {available} of {title} available in stock")]
    InsufficientStock {
        title: String,
        /// Units currently in stock.
        available: u32,
    },
}

/// One cart line: a product snapshot in a given size.
///
/// Lines are unique by `(product.id, size)`; adding the same combination
/// again increments the existing line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product snapshot taken at add-to-cart time.
    pub product: Product,
    /// Units of this line; always >= 1.
    pub quantity: u32,
    /// Chosen size, if the product has sizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Discounted unit price for this line.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.product.discounted_price()
    }

    /// Discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price().times(self.quantity)
    }

    fn matches(&self, product_id: &ProductId, size: Option<&str>) -> bool {
        self.product.id == *product_id && self.size.as_deref() == size
    }
}

/// A shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a product in the given size.
    ///
    /// Increments the matching line or creates a new one. Refuses to go
    /// beyond the product's available stock; a refused add leaves the cart
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] for products with zero stock and
    /// [`CartError::InsufficientStock`] when the line is already at stock.
    pub fn add(&mut self, product: &Product, size: Option<&str>) -> Result<(), CartError> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock {
                title: product.title.clone(),
            });
        }

        if let Some(line) = self.find_line_mut(&product.id, size) {
            if line.quantity >= product.quantity {
                return Err(CartError::InsufficientStock {
                    title: product.title.clone(),
                    available: product.quantity,
                });
            }
            line.quantity += 1;
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
                size: size.map(str::to_owned),
                added_at: Utc::now(),
            });
        }
        Ok(())
    }

    /// Remove one unit of a line, deleting it when the last unit goes.
    ///
    /// Unknown lines are a no-op.
    pub fn remove(&mut self, product_id: &ProductId, size: Option<&str>) {
        if let Some(index) = self.items.iter().position(|i| i.matches(product_id, size)) {
            if let Some(line) = self.items.get_mut(index) {
                if line.quantity > 1 {
                    line.quantity -= 1;
                    return;
                }
            }
            self.items.remove(index);
        }
    }

    /// Delete a line entirely, regardless of quantity.
    pub fn remove_line(&mut self, product_id: &ProductId, size: Option<&str>) {
        self.items.retain(|i| !i.matches(product_id, size));
    }

    /// Set a line's quantity, clamped to the product's stock.
    ///
    /// A quantity of zero deletes the line. Returns the quantity actually
    /// applied, or `None` if no such line exists.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        quantity: u32,
    ) -> Option<u32> {
        if quantity == 0 {
            let existed = self.items.iter().any(|i| i.matches(product_id, size));
            self.remove_line(product_id, size);
            return existed.then_some(0);
        }

        let line = self.find_line_mut(product_id, size)?;
        let applied = quantity.min(line.product.quantity);
        line.quantity = applied;
        Some(applied)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Clear the cart and add a single unit of one product.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Cart::add`]; the cart ends up empty if
    /// the add is refused.
    pub fn buy_now(&mut self, product: &Product, size: Option<&str>) -> Result<(), CartError> {
        self.clear();
        self.add(product, size)
    }

    /// Sum of discounted line prices.
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    fn find_line_mut(&mut self, product_id: &ProductId, size: Option<&str>) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.matches(product_id, size))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee(stock: u32) -> Product {
        Product {
            id: ProductId::new("prod_tee"),
            title: "Training Tee".to_owned(),
            description: None,
            price: Money::from_rupees(1000),
            discount: 10,
            quantity: stock,
            sizes: vec!["M".to_owned(), "L".to_owned()],
            image_url: None,
            images: vec![],
            category: None,
            features: vec![],
            featured: false,
            hero_banner: false,
            banner_order: None,
            average_rating: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_single_item_discounted_total() {
        let mut cart = Cart::new();
        cart.add(&tee(5), Some("M")).unwrap();
        // price 1000 at 10% off -> line total 900
        assert_eq!(cart.total(), Money::from_rupees(900));
    }

    #[test]
    fn test_adding_same_product_and_size_increments() {
        let mut cart = Cart::new();
        cart.add(&tee(5), Some("M")).unwrap();
        cart.add(&tee(5), Some("M")).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), Money::from_rupees(1800));
    }

    #[test]
    fn test_different_sizes_are_separate_lines() {
        let mut cart = Cart::new();
        cart.add(&tee(5), Some("M")).unwrap();
        cart.add(&tee(5), Some("L")).unwrap();
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_beyond_stock_is_rejected_and_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(&tee(2), Some("M")).unwrap();
        cart.add(&tee(2), Some("M")).unwrap();

        let before = cart.clone();
        let err = cart.add(&tee(2), Some("M")).unwrap_err();

        assert_eq!(
            err,
            CartError::InsufficientStock {
                title: "Training Tee".to_owned(),
                available: 2,
            }
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_out_of_stock_product() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&tee(0), None),
            Err(CartError::OutOfStock { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_decrements_then_deletes() {
        let mut cart = Cart::new();
        cart.add(&tee(5), Some("M")).unwrap();
        cart.add(&tee(5), Some("M")).unwrap();

        let id = ProductId::new("prod_tee");
        cart.remove(&id, Some("M"));
        assert_eq!(cart.items()[0].quantity, 1);

        cart.remove(&id, Some("M"));
        assert!(cart.is_empty());

        // removing from an empty cart is a no-op
        cart.remove(&id, Some("M"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_line_deletes_all_units() {
        let mut cart = Cart::new();
        cart.add(&tee(5), Some("M")).unwrap();
        cart.add(&tee(5), Some("M")).unwrap();

        cart.remove_line(&ProductId::new("prod_tee"), Some("M"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_to_stock() {
        let mut cart = Cart::new();
        cart.add(&tee(3), Some("M")).unwrap();

        let applied = cart.update_quantity(&ProductId::new("prod_tee"), Some("M"), 10);
        assert_eq!(applied, Some(3));
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(&tee(3), Some("M")).unwrap();

        let applied = cart.update_quantity(&ProductId::new("prod_tee"), Some("M"), 0);
        assert_eq!(applied, Some(0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_line() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.update_quantity(&ProductId::new("prod_missing"), None, 2),
            None
        );
    }

    #[test]
    fn test_buy_now_replaces_cart() {
        let mut cart = Cart::new();
        cart.add(&tee(5), Some("M")).unwrap();
        cart.add(&tee(5), Some("L")).unwrap();

        cart.buy_now(&tee(5), Some("L")).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].size.as_deref(), Some("L"));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add(&tee(5), Some("M")).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let parsed: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
    }
}
