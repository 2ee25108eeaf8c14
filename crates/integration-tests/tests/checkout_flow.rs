//! End-to-end checkout flow tests against fake collaborators.
//!
//! These cover the gate ordering of `begin` and the
//! verify/persist/ship/report sequence of `complete`.

use std::sync::Arc;

use spotfit_core::Cart;
use spotfit_storefront::checkout::{CheckoutError, PaymentConfirmation};
use spotfit_storefront::shipping::PENDING_SHIPMENT;
use spotfit_storefront::store::AddressBook;

use spotfit_integration_tests::fakes::{FAKE_ORDER_ID, FakeBackend, FakeProvider};
use spotfit_integration_tests::fixtures::{
    FALLBACK_MERCHANT_KEY, address_book, cart_with_two_tees, customer, delhi_address, orchestrator,
};

fn confirmation() -> PaymentConfirmation {
    PaymentConfirmation {
        order_id: FAKE_ORDER_ID.into(),
        payment_id: "pay_fake_1".into(),
        signature: "valid-signature".into(),
    }
}

// =============================================================================
// begin: gate ordering
// =============================================================================

#[tokio::test]
async fn begin_mints_payment_session_for_valid_state() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let session = checkout
        .begin(
            Some(&customer()),
            &address_book(),
            &cart_with_two_tees(),
            "/checkout",
        )
        .await
        .expect("all gates pass");

    // ₹1800 cart -> 180000 paise, from the environment-fallback key path
    assert_eq!(session.order.amount, 180_000);
    assert_eq!(session.options.amount, 180_000);
    assert_eq!(session.options.currency, "INR");
    assert_eq!(session.options.key, FALLBACK_MERCHANT_KEY);
    assert_eq!(session.options.order_id.as_str(), FAKE_ORDER_ID);
    assert_eq!(session.options.prefill.contact, "9137532150");

    let recorded = backend.payment_orders.lock().expect("lock");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].amount, 180_000);
    assert!(recorded[0].receipt.starts_with("order_"));
}

#[tokio::test]
async fn begin_requires_authentication_with_return_path() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let err = checkout
        .begin(None, &address_book(), &cart_with_two_tees(), "/checkout")
        .await
        .expect_err("gate 1 fails");

    match err {
        CheckoutError::NotAuthenticated { return_to } => assert_eq!(return_to, "/checkout"),
        other => panic!("expected NotAuthenticated, got {other:?}"),
    }
    assert!(backend.payment_orders.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn begin_requires_a_selected_address() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let err = checkout
        .begin(
            Some(&customer()),
            &AddressBook::default(),
            &cart_with_two_tees(),
            "/checkout",
        )
        .await
        .expect_err("gate 2 fails");

    assert!(matches!(err, CheckoutError::MissingAddress));
}

#[tokio::test]
async fn begin_rejects_incomplete_address() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let mut bad = delhi_address();
    bad.pincode = "11008".to_owned(); // five digits
    let mut book = AddressBook::default();
    book.add(bad);

    let err = checkout
        .begin(Some(&customer()), &book, &cart_with_two_tees(), "/checkout")
        .await
        .expect_err("gate 2 fails");

    assert!(matches!(err, CheckoutError::InvalidAddress(_)));
    // an invalid pincode must never reach the provider
    assert!(provider.attempted_locations.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn begin_rejects_unserviceable_pincode() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider {
        serviceable: false,
        ..FakeProvider::default()
    });
    let checkout = orchestrator(&backend, &provider);

    let err = checkout
        .begin(
            Some(&customer()),
            &address_book(),
            &cart_with_two_tees(),
            "/checkout",
        )
        .await
        .expect_err("gate 3 fails");

    assert!(matches!(err, CheckoutError::NotServiceable { .. }));
    assert!(backend.payment_orders.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn begin_rejects_empty_cart() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let err = checkout
        .begin(Some(&customer()), &address_book(), &Cart::new(), "/checkout")
        .await
        .expect_err("gate 4 fails");

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(backend.payment_orders.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn begin_surfaces_payment_order_failure() {
    let backend = Arc::new(FakeBackend {
        fail_create_payment_order: true,
        ..FakeBackend::default()
    });
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let err = checkout
        .begin(
            Some(&customer()),
            &address_book(),
            &cart_with_two_tees(),
            "/checkout",
        )
        .await
        .expect_err("gate 6 fails");

    assert!(matches!(err, CheckoutError::PaymentOrder(_)));
}

// =============================================================================
// complete: verification, persistence, shipment
// =============================================================================

#[tokio::test]
async fn complete_persists_order_and_records_awb() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let outcome = checkout
        .complete(
            &confirmation(),
            &customer(),
            &address_book(),
            &cart_with_two_tees(),
        )
        .await
        .expect("verified payment completes");

    assert_eq!(outcome.tracking.as_deref(), Some("AWB123"));

    let orders = backend.orders.lock().expect("lock");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].items[0].quantity, 2);

    let updates = backend.shipment_updates.lock().expect("lock");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].waybill, "AWB123");
    assert_eq!(updates[0].status, "shipment_created");
    assert_eq!(updates[0].courier, "Delhivery");
}

#[tokio::test]
async fn complete_stops_at_failed_verification() {
    let backend = Arc::new(FakeBackend {
        verify_success: false,
        ..FakeBackend::default()
    });
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    let err = checkout
        .complete(
            &confirmation(),
            &customer(),
            &address_book(),
            &cart_with_two_tees(),
        )
        .await
        .expect_err("verification rejected");

    assert!(matches!(err, CheckoutError::VerificationFailed));
    // nothing persisted, no carrier contact
    assert!(backend.orders.lock().expect("lock").is_empty());
    assert!(backend.shipment_updates.lock().expect("lock").is_empty());
    assert!(provider.attempted_locations.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn complete_survives_order_persistence_outage() {
    let backend = Arc::new(FakeBackend {
        fail_create_order: true,
        ..FakeBackend::default()
    });
    let provider = Arc::new(FakeProvider::default());
    let checkout = orchestrator(&backend, &provider);

    // A paid order must still reach the confirmation step
    let outcome = checkout
        .complete(
            &confirmation(),
            &customer(),
            &address_book(),
            &cart_with_two_tees(),
        )
        .await
        .expect("persistence outage is non-fatal");

    assert_eq!(outcome.tracking.as_deref(), Some("AWB123"));
}

#[tokio::test]
async fn complete_marks_pending_when_every_pickup_location_fails() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider {
        accepts: vec![], // every carrier order attempt is rejected
        ..FakeProvider::default()
    });
    let checkout = orchestrator(&backend, &provider);

    let outcome = checkout
        .complete(
            &confirmation(),
            &customer(),
            &address_book(),
            &cart_with_two_tees(),
        )
        .await
        .expect("shipment failure never fails a paid order");

    // No tracking for the customer, sentinel stored on the order
    assert_eq!(outcome.tracking, None);
    let updates = backend.shipment_updates.lock().expect("lock");
    assert_eq!(updates[0].waybill, PENDING_SHIPMENT);
    assert_eq!(updates[0].status, "pending_shipment");
}

#[tokio::test]
async fn complete_falls_back_to_shipment_reference_without_awb() {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(FakeProvider {
        awb_on_assign: None, // AWB assignment fails after a created order
        ..FakeProvider::default()
    });
    let checkout = orchestrator(&backend, &provider);

    let outcome = checkout
        .complete(
            &confirmation(),
            &customer(),
            &address_book(),
            &cart_with_two_tees(),
        )
        .await
        .expect("AWB failure is non-fatal");

    assert_eq!(
        outcome.tracking.as_deref(),
        Some(spotfit_integration_tests::fakes::FAKE_SHIPMENT_ID.to_string().as_str())
    );
}
