//! Pickup-location worklist behavior of the shipment creator.

use std::sync::Arc;

use spotfit_storefront::shipping::{ShipmentCreator, ShipmentRequest, TrackingAssignment};
use spotfit_storefront::store::AddressBook;

use spotfit_integration_tests::fakes::FakeProvider;
use spotfit_integration_tests::fixtures::{cart_with_two_tees, customer, delhi_address};

fn request() -> ShipmentRequest {
    let mut book = AddressBook::default();
    book.add(delhi_address());
    let cart = cart_with_two_tees();

    ShipmentRequest {
        order_id: "order_fake_1".into(),
        customer: customer(),
        address: book.selected().expect("selected").clone(),
        items: cart.items().to_vec(),
        sub_total: cart.total(),
    }
}

#[tokio::test]
async fn discovered_locations_are_retried_after_rejection() {
    // The provider lists a stale location, rejects it, and names the
    // valid one in the error payload.
    let provider = Arc::new(FakeProvider {
        listing: Some(vec!["Old Warehouse".to_owned()]),
        accepts: vec!["Rohini Warehouse".to_owned()],
        discovers: vec!["Rohini Warehouse".to_owned()],
        ..FakeProvider::default()
    });
    let creator = ShipmentCreator::new(Arc::clone(&provider), vec![]);

    let outcome = creator.create(&request()).await;

    assert_eq!(
        outcome.tracking,
        TrackingAssignment::Awb("AWB123".to_owned())
    );
    let attempts = provider.attempted_locations.lock().expect("lock");
    assert_eq!(attempts.as_slice(), ["Old Warehouse", "Rohini Warehouse"]);
}

#[tokio::test]
async fn listing_outage_falls_back_to_configured_locations() {
    let provider = Arc::new(FakeProvider {
        listing: None, // provider listing call fails
        accepts: vec!["Primary".to_owned()],
        ..FakeProvider::default()
    });
    let creator = ShipmentCreator::new(
        Arc::clone(&provider),
        vec!["Primary".to_owned(), "Backup".to_owned()],
    );

    let outcome = creator.create(&request()).await;

    assert!(!outcome.tracking.is_pending());
    let attempts = provider.attempted_locations.lock().expect("lock");
    assert_eq!(attempts.as_slice(), ["Primary"]);
}

#[tokio::test]
async fn hostile_discovery_is_capped() {
    // Every attempt is rejected and "discovers" yet another bogus name;
    // the worklist must stop at its attempt cap instead of looping.
    let provider = Arc::new(FakeProvider {
        listing: Some(vec!["Loc A".to_owned()]),
        accepts: vec![],
        discovers: vec![
            "Loc B".to_owned(),
            "Loc C".to_owned(),
            "Loc D".to_owned(),
            "Loc E".to_owned(),
            "Loc F".to_owned(),
            "Loc G".to_owned(),
            "Loc H".to_owned(),
            "Loc I".to_owned(),
            "Loc J".to_owned(),
        ],
        ..FakeProvider::default()
    });
    let creator = ShipmentCreator::new(Arc::clone(&provider), vec![]);

    let outcome = creator.create(&request()).await;

    assert!(outcome.tracking.is_pending());
    // cap is 8 attempts per order
    let attempts = provider.attempted_locations.lock().expect("lock");
    assert_eq!(attempts.len(), 8);
    // and no location is ever tried twice
    let mut unique = attempts.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), attempts.len());
}

#[tokio::test]
async fn awb_on_creation_skips_assignment() {
    let provider = Arc::new(FakeProvider {
        awb_on_create: Some("AWB777".to_owned()),
        awb_on_assign: None, // assignment would fail, but is never called
        ..FakeProvider::default()
    });
    let creator = ShipmentCreator::new(Arc::clone(&provider), vec![]);

    let outcome = creator.create(&request()).await;

    assert_eq!(
        outcome.tracking,
        TrackingAssignment::Awb("AWB777".to_owned())
    );
}
