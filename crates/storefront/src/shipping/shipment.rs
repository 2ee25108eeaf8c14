//! Carrier shipment creation with pickup-location fallback.
//!
//! A paid order must always end up with *some* tracking value:
//!
//! 1. Try pickup locations in order (provider listing, else configured
//!    fallback). A provider error that lists valid location names feeds
//!    the unseen ones back into the queue.
//! 2. After a successful carrier order, use its AWB if present, else
//!    request AWB assignment, else record the carrier shipment id.
//! 3. If every location is rejected, record the [`PENDING_SHIPMENT`]
//!    sentinel - shipment failure never surfaces to the paying customer.

use std::collections::{HashSet, VecDeque};

use chrono::Utc;
use tracing::{instrument, warn};

use spotfit_core::{Address, CartItem, Money, OrderId};

use crate::models::CurrentUser;

use super::types::{CarrierOrderItem, CarrierOrderResponse, CreateCarrierOrderRequest};
use super::{ShippingError, ShippingProvider};

/// Tracking sentinel recorded when no pickup location worked.
pub const PENDING_SHIPMENT: &str = "PENDING_SHIPMENT";

/// Hard cap on carrier order attempts per order, across seeded and
/// discovered locations. Keeps a pathological provider from turning the
/// self-correcting retry into an unbounded loop.
const MAX_PICKUP_ATTEMPTS: usize = 8;

/// Default package weight in kg when lines carry no weight data.
const DEFAULT_WEIGHT_KG: f64 = 0.5;

// =============================================================================
// Pickup worklist
// =============================================================================

/// Worklist of candidate pickup-location names.
///
/// Seeded from config or the provider listing and extended from provider
/// error payloads. Never yields the same name twice and never yields more
/// than the attempt cap.
#[derive(Debug)]
pub struct PickupQueue {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    attempts: usize,
}

impl PickupQueue {
    /// Create a queue from seed locations, deduplicating.
    #[must_use]
    pub fn new(seed: impl IntoIterator<Item = String>) -> Self {
        let mut queue = Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            attempts: 0,
        };
        for name in seed {
            queue.enqueue(name);
        }
        queue
    }

    /// Next candidate, or `None` when exhausted or capped.
    pub fn next(&mut self) -> Option<String> {
        if self.attempts >= MAX_PICKUP_ATTEMPTS {
            return None;
        }
        let name = self.queue.pop_front()?;
        self.attempts += 1;
        Some(name)
    }

    /// Merge location names discovered from a provider error payload.
    ///
    /// Names already seen (tried or queued) are ignored.
    pub fn merge_discovered(&mut self, names: &[String]) {
        for name in names {
            self.enqueue(name.clone());
        }
    }

    /// Carrier order attempts made so far.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        self.attempts
    }

    fn enqueue(&mut self, name: String) {
        let name = name.trim().to_owned();
        if name.is_empty() || !self.seen.insert(name.clone()) {
            return;
        }
        self.queue.push_back(name);
    }
}

// =============================================================================
// Tracking outcome
// =============================================================================

/// How a paid order ended up tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingAssignment {
    /// Carrier-assigned tracking number.
    Awb(String),
    /// Carrier order created but no AWB; the provider shipment id stands
    /// in as the tracking value.
    ShipmentRef(i64),
    /// No pickup location worked; shipment will be created manually.
    Pending,
}

impl TrackingAssignment {
    /// The value stored on the order record.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Awb(code) => code.clone(),
            Self::ShipmentRef(id) => id.to_string(),
            Self::Pending => PENDING_SHIPMENT.to_owned(),
        }
    }

    /// Whether shipment creation was deferred.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The tracking identifier to show the customer, if one exists.
    #[must_use]
    pub fn customer_facing(&self) -> Option<String> {
        match self {
            Self::Pending => None,
            _ => Some(self.value()),
        }
    }
}

/// Final shipment result for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentOutcome {
    pub tracking: TrackingAssignment,
    /// Courier that accepted the shipment, when known.
    pub courier: Option<String>,
}

impl ShipmentOutcome {
    /// Status string recorded on the backend order.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.tracking.is_pending() {
            "pending_shipment"
        } else {
            "shipment_created"
        }
    }
}

/// Everything needed to create a shipment for a paid order.
#[derive(Debug, Clone)]
pub struct ShipmentRequest {
    pub order_id: OrderId,
    pub customer: CurrentUser,
    pub address: Address,
    pub items: Vec<CartItem>,
    pub sub_total: Money,
}

// =============================================================================
// ShipmentCreator
// =============================================================================

/// Creates carrier shipments for paid orders.
pub struct ShipmentCreator<P> {
    provider: P,
    fallback_locations: Vec<String>,
}

impl<P: ShippingProvider> ShipmentCreator<P> {
    /// Create a shipment creator.
    ///
    /// `fallback_locations` is used when the provider's own listing is
    /// unreachable or empty.
    #[must_use]
    pub fn new(provider: P, fallback_locations: Vec<String>) -> Self {
        Self {
            provider,
            fallback_locations,
        }
    }

    /// Create a carrier shipment, never failing the caller.
    ///
    /// Works through pickup-location candidates sequentially (one carrier
    /// order in flight at a time - concurrent attempts could create
    /// duplicate carrier orders) and downgrades total failure to
    /// [`TrackingAssignment::Pending`].
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create(&self, request: &ShipmentRequest) -> ShipmentOutcome {
        let mut queue = PickupQueue::new(self.seed_locations().await);

        while let Some(location) = queue.next() {
            let order_request = build_carrier_order(request, &location);

            match self.provider.create_order(&order_request).await {
                Ok(response) => {
                    tracing::info!(
                        pickup_location = %location,
                        shipment_id = response.shipment_id,
                        "carrier order created"
                    );
                    return self.assign_tracking(response).await;
                }
                Err(ShippingError::Api {
                    status,
                    message,
                    available_locations,
                }) => {
                    warn!(
                        pickup_location = %location,
                        status,
                        %message,
                        "carrier rejected pickup location"
                    );
                    if !available_locations.is_empty() {
                        queue.merge_discovered(&available_locations);
                    }
                }
                Err(err) => {
                    warn!(pickup_location = %location, error = %err, "carrier order attempt failed");
                }
            }
        }

        warn!(
            attempts = queue.attempts(),
            "no pickup location accepted the order; marking shipment pending"
        );
        ShipmentOutcome {
            tracking: TrackingAssignment::Pending,
            courier: None,
        }
    }

    async fn seed_locations(&self) -> Vec<String> {
        match self.provider.pickup_locations().await {
            Ok(locations) if !locations.is_empty() => locations
                .into_iter()
                .map(|location| location.pickup_location)
                .collect(),
            Ok(_) => {
                warn!("provider returned no pickup locations; using configured fallback");
                self.fallback_locations.clone()
            }
            Err(err) => {
                warn!(error = %err, "pickup location listing failed; using configured fallback");
                self.fallback_locations.clone()
            }
        }
    }

    /// AWB if available, else the shipment id. A created carrier order is
    /// never downgraded to pending just because AWB assignment failed.
    async fn assign_tracking(&self, response: CarrierOrderResponse) -> ShipmentOutcome {
        if !response.awb_code.is_empty() {
            return ShipmentOutcome {
                tracking: TrackingAssignment::Awb(response.awb_code),
                courier: response.courier_name,
            };
        }

        match self
            .provider
            .assign_awb(response.shipment_id, response.courier_company_id)
            .await
        {
            Ok(assignment) if !assignment.awb_code.is_empty() => ShipmentOutcome {
                tracking: TrackingAssignment::Awb(assignment.awb_code),
                courier: assignment.courier_name.or(response.courier_name),
            },
            Ok(_) => {
                warn!(
                    shipment_id = response.shipment_id,
                    "AWB assignment returned no code; recording shipment reference"
                );
                ShipmentOutcome {
                    tracking: TrackingAssignment::ShipmentRef(response.shipment_id),
                    courier: response.courier_name,
                }
            }
            Err(err) => {
                warn!(
                    shipment_id = response.shipment_id,
                    error = %err,
                    "AWB assignment failed; recording shipment reference"
                );
                ShipmentOutcome {
                    tracking: TrackingAssignment::ShipmentRef(response.shipment_id),
                    courier: response.courier_name,
                }
            }
        }
    }
}

fn build_carrier_order(request: &ShipmentRequest, location: &str) -> CreateCarrierOrderRequest {
    let order_items = request
        .items
        .iter()
        .map(|item| CarrierOrderItem {
            name: match item.size.as_deref() {
                Some(size) => format!("{} (Size: {size})", item.product.title),
                None => item.product.title.clone(),
            },
            sku: item.product.id.to_string(),
            units: item.quantity,
            selling_price: item.unit_price().to_paise().unwrap_or(0) / 100,
        })
        .collect();

    CreateCarrierOrderRequest {
        order_id: request.order_id.to_string(),
        order_date: Utc::now().format("%Y-%m-%d %H:%M").to_string(),
        pickup_location: location.to_owned(),
        billing_customer_name: request.address.full_name.clone(),
        billing_last_name: String::new(),
        billing_address: request.address.address_line1.clone(),
        billing_address_2: request.address.address_line2.clone(),
        billing_city: request.address.city.clone(),
        billing_pincode: request.address.pincode.clone(),
        billing_state: request.address.state.clone(),
        billing_country: request.address.country.clone(),
        billing_email: request.customer.email.as_str().to_owned(),
        billing_phone: request.address.phone.clone(),
        shipping_is_billing: true,
        order_items,
        payment_method: "Prepaid".to_owned(),
        sub_total: request.sub_total.to_paise().unwrap_or(0) / 100,
        weight: DEFAULT_WEIGHT_KG,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_deduplicates_seed() {
        let mut queue = PickupQueue::new(vec![
            "Primary".to_owned(),
            "Primary".to_owned(),
            " Rohini ".to_owned(),
        ]);

        assert_eq!(queue.next().as_deref(), Some("Primary"));
        assert_eq!(queue.next().as_deref(), Some("Rohini"));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn test_queue_never_yields_seen_discoveries() {
        let mut queue = PickupQueue::new(vec!["Primary".to_owned()]);
        assert_eq!(queue.next().as_deref(), Some("Primary"));

        // "Primary" was already tried; only the new name enters the queue
        queue.merge_discovered(&["Primary".to_owned(), "Rohini".to_owned()]);
        assert_eq!(queue.next().as_deref(), Some("Rohini"));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn test_queue_respects_attempt_cap() {
        let seed: Vec<String> = (0..20).map(|i| format!("Location {i}")).collect();
        let mut queue = PickupQueue::new(seed);

        let mut yielded = 0;
        while queue.next().is_some() {
            yielded += 1;
            // A hostile provider keeps "discovering" fresh names
            queue.merge_discovered(&[format!("Discovered {yielded}")]);
        }

        assert_eq!(yielded, MAX_PICKUP_ATTEMPTS);
    }

    #[test]
    fn test_queue_ignores_blank_names() {
        let mut queue = PickupQueue::new(vec![String::new(), "  ".to_owned()]);
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn test_tracking_values() {
        assert_eq!(TrackingAssignment::Awb("AWB123".to_owned()).value(), "AWB123");
        assert_eq!(TrackingAssignment::ShipmentRef(8765).value(), "8765");
        assert_eq!(TrackingAssignment::Pending.value(), PENDING_SHIPMENT);

        assert!(TrackingAssignment::Pending.customer_facing().is_none());
        assert_eq!(
            TrackingAssignment::ShipmentRef(8765).customer_facing().as_deref(),
            Some("8765")
        );
    }

    #[test]
    fn test_outcome_status_strings() {
        let created = ShipmentOutcome {
            tracking: TrackingAssignment::Awb("AWB123".to_owned()),
            courier: Some("Delhivery".to_owned()),
        };
        assert_eq!(created.status(), "shipment_created");

        let pending = ShipmentOutcome {
            tracking: TrackingAssignment::Pending,
            courier: None,
        };
        assert_eq!(pending.status(), "pending_shipment");
    }
}
