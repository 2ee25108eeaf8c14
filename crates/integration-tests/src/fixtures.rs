//! Shared fixtures for flow tests.

use std::sync::Arc;

use spotfit_core::{Cart, Email, Money, Product, ProductId, UserId, UserRole};
use spotfit_storefront::checkout::CheckoutOrchestrator;
use spotfit_storefront::config::{BackendApiConfig, PaymentConfig};
use spotfit_storefront::models::CurrentUser;
use spotfit_storefront::payment::MerchantKeys;
use spotfit_storefront::shipping::{ServiceabilityChecker, ShipmentCreator};
use spotfit_storefront::store::{AddressBook, AddressInput};

use crate::fakes::{FakeBackend, FakeProvider};

/// Merchant key configured as the environment fallback.
pub const FALLBACK_MERCHANT_KEY: &str = "rzp_live_fixture_key";

/// The orchestrator as wired against the fakes.
pub type FakeCheckout = CheckoutOrchestrator<Arc<FakeBackend>, Arc<FakeProvider>>;

/// Wire an orchestrator around fake collaborators.
///
/// The merchant-key config endpoint points at an unroutable port, so key
/// resolution always lands on the environment fallback - exactly the
/// late-load path a cold-started server takes.
#[must_use]
pub fn orchestrator(backend: &Arc<FakeBackend>, provider: &Arc<FakeProvider>) -> FakeCheckout {
    let keys = MerchantKeys::new(
        &BackendApiConfig {
            base_url: "http://127.0.0.1:9/api".to_owned(),
        },
        &PaymentConfig {
            fallback_key_id: Some(FALLBACK_MERCHANT_KEY.to_owned()),
        },
    )
    .expect("merchant keys");

    CheckoutOrchestrator::new(
        Arc::clone(backend),
        keys,
        ServiceabilityChecker::new(Arc::clone(provider)),
        ShipmentCreator::new(Arc::clone(provider), vec!["Primary".to_owned()]),
    )
}

/// A tee: ₹1000 list price, 10% discount, configurable stock.
#[must_use]
pub fn tee(stock: u32) -> Product {
    Product {
        id: ProductId::new("prod_tee"),
        title: "Training Tee".to_owned(),
        description: None,
        price: Money::from_rupees(1000),
        discount: 10,
        quantity: stock,
        sizes: vec!["M".to_owned(), "L".to_owned()],
        image_url: Some("https://cdn.spotfit.in/tee.jpg".to_owned()),
        images: vec![],
        category: Some("t-shirts".to_owned()),
        features: vec![],
        featured: false,
        hero_banner: false,
        banner_order: None,
        average_rating: None,
        created_at: None,
        updated_at: None,
    }
}

/// A cart holding two discounted tees (total ₹1800).
#[must_use]
pub fn cart_with_two_tees() -> Cart {
    let mut cart = Cart::new();
    cart.add(&tee(5), Some("M")).expect("in stock");
    cart.add(&tee(5), Some("M")).expect("in stock");
    cart
}

/// A logged-in customer.
#[must_use]
pub fn customer() -> CurrentUser {
    CurrentUser {
        id: UserId::new("user_asha"),
        email: Email::parse("asha@example.com").expect("valid email"),
        name: "Asha Verma".to_owned(),
        role: UserRole::Customer,
    }
}

/// An address book with one complete, selected Delhi address.
#[must_use]
pub fn address_book() -> AddressBook {
    let mut book = AddressBook::default();
    book.add(delhi_address());
    book
}

/// A complete Delhi address (valid 6-digit pincode).
#[must_use]
pub fn delhi_address() -> AddressInput {
    AddressInput {
        full_name: "Asha Verma".to_owned(),
        phone: "9137532150".to_owned(),
        address_line1: "B-2/79 2nd floor".to_owned(),
        address_line2: Some("Rohini Sector 16".to_owned()),
        city: "Delhi".to_owned(),
        state: "Delhi".to_owned(),
        pincode: "110089".to_owned(),
        country: "India".to_owned(),
        is_default: true,
        kind: spotfit_core::AddressKind::Home,
    }
}
