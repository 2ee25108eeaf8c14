//! Session-backed cart store.

use tokio::sync::watch;
use tower_sessions::Session;

use spotfit_core::{Cart, CartError, Money, Product, ProductId};

use crate::models::session_keys;

use super::StoreError;

/// A cart bound to one customer's session.
///
/// Wraps the pure [`Cart`] calculus with persistence and change
/// notification: every mutation goes through the cart's stock-clamped
/// operations, then broadcasts the new snapshot to watch subscribers.
/// Persistence is explicit - call [`CartStore::save`] after mutating.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    tx: watch::Sender<Cart>,
}

impl CartStore {
    /// Create a store around an existing cart.
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        let (tx, _rx) = watch::channel(cart.clone());
        Self { cart, tx }
    }

    /// Load the cart from the session.
    ///
    /// A missing or corrupt blob yields an empty cart; the bad blob is
    /// replaced on the next save.
    pub async fn load(session: &Session) -> Self {
        let cart = match session.get::<Cart>(session_keys::CART).await {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt cart blob");
                Cart::new()
            }
        };
        Self::new(cart)
    }

    /// Persist the cart to the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Session`] if the session backend refuses the
    /// write.
    pub async fn save(&self, session: &Session) -> Result<(), StoreError> {
        session.insert(session_keys::CART, &self.cart).await?;
        Ok(())
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Subscribe to cart snapshots.
    ///
    /// The receiver holds the snapshot as of subscription and is updated
    /// on every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.tx.subscribe()
    }

    /// Add one unit; see [`Cart::add`].
    ///
    /// # Errors
    ///
    /// Propagates stock refusals; a refused add publishes nothing.
    pub fn add(&mut self, product: &Product, size: Option<&str>) -> Result<(), CartError> {
        self.cart.add(product, size)?;
        self.publish();
        Ok(())
    }

    /// Remove one unit; see [`Cart::remove`].
    pub fn remove(&mut self, product_id: &ProductId, size: Option<&str>) {
        self.cart.remove(product_id, size);
        self.publish();
    }

    /// Delete a line entirely; see [`Cart::remove_line`].
    pub fn remove_line(&mut self, product_id: &ProductId, size: Option<&str>) {
        self.cart.remove_line(product_id, size);
        self.publish();
    }

    /// Set a line quantity (clamped); see [`Cart::update_quantity`].
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        quantity: u32,
    ) -> Option<u32> {
        let applied = self.cart.update_quantity(product_id, size, quantity);
        self.publish();
        applied
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.publish();
    }

    /// Clear and add a single unit; see [`Cart::buy_now`].
    ///
    /// # Errors
    ///
    /// Propagates stock refusals.
    pub fn buy_now(&mut self, product: &Product, size: Option<&str>) -> Result<(), CartError> {
        let result = self.cart.buy_now(product, size);
        // buy_now clears even when the add is refused, so always publish
        self.publish();
        result
    }

    /// Sum of discounted line prices.
    #[must_use]
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    fn publish(&self) {
        self.tx.send_replace(self.cart.clone());
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Cart::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use spotfit_core::Money;

    fn shorts(stock: u32) -> Product {
        Product {
            id: ProductId::new("prod_shorts"),
            title: "Flex Shorts".to_owned(),
            description: None,
            price: Money::from_rupees(800),
            discount: 0,
            quantity: stock,
            sizes: vec![],
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
    fn test_mutations_notify_subscribers() {
        let mut store = CartStore::default();
        let rx = store.subscribe();

        store.add(&shorts(3), None).unwrap();
        assert_eq!(rx.borrow().item_count(), 1);

        store.add(&shorts(3), None).unwrap();
        assert_eq!(rx.borrow().item_count(), 2);

        store.clear();
        assert!(rx.borrow().is_empty());
    }

    #[test]
    fn test_refused_add_publishes_nothing() {
        let mut store = CartStore::default();
        store.add(&shorts(1), None).unwrap();

        let mut rx = store.subscribe();
        rx.mark_unchanged();

        assert!(store.add(&shorts(1), None).is_err());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_totals_delegate_to_cart() {
        let mut store = CartStore::default();
        store.add(&shorts(5), None).unwrap();
        store.update_quantity(&ProductId::new("prod_shorts"), None, 3);

        assert_eq!(store.total(), Money::from_rupees(2400));
        assert_eq!(store.item_count(), 3);
    }
}
