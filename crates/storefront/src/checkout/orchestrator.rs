//! The checkout orchestrator.
//!
//! Checkout is split in two around the browser handoff:
//!
//! - [`CheckoutOrchestrator::begin`] runs the precondition gates in
//!   order, creates the payment order server-side, and returns the
//!   gateway widget payload. The widget then collects payment in the
//!   customer's browser.
//! - [`CheckoutOrchestrator::complete`] consumes the widget's success
//!   callback: verifies the payment server-side, persists the order,
//!   creates the shipment, and reports the outcome. The route layer
//!   clears the cart on success.
//!
//! The sequence is strictly ordered; no step starts before the previous
//! one resolves, and a failed gate short-circuits with a customer-facing
//! message.

use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use tracing::{instrument, warn};

use serde::{Deserialize, Serialize};

use spotfit_core::{Cart, Money, OrderId, PaymentId};

use crate::api::{
    CreatePaymentOrderRequest, OrderBackend, OrderCustomer, OrderLineItem, OrderRecord,
    PaymentOrder, ShipmentUpdate, VerifyPaymentRequest,
};
use crate::models::CurrentUser;
use crate::payment::{CheckoutOptions, MerchantKeys};
use crate::shipping::{
    ServiceabilityChecker, ShipmentCreator, ShipmentRequest, ShippingProvider,
};
use crate::store::AddressBook;

use super::CheckoutError;

/// Courier recorded when the provider does not name one.
const DEFAULT_COURIER: &str = "Shiprocket";

/// Result of [`CheckoutOrchestrator::begin`]: the minted payment order
/// plus the widget construction payload.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSession {
    pub order: PaymentOrder,
    pub options: CheckoutOptions,
}

/// The gateway widget's success callback payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfirmation {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    /// Gateway HMAC signature over (order id, payment id).
    pub signature: String,
}

/// Result of a completed checkout.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    /// Tracking identifier for the confirmation view; `None` while the
    /// shipment is pending.
    pub tracking: Option<String>,
}

/// Drives a purchase to completion with ordered precondition gates.
pub struct CheckoutOrchestrator<B, P> {
    backend: B,
    keys: MerchantKeys,
    serviceability: ServiceabilityChecker<P>,
    shipments: ShipmentCreator<P>,
}

impl<B, P> CheckoutOrchestrator<B, P>
where
    B: OrderBackend,
    P: ShippingProvider,
{
    /// Create an orchestrator from its collaborators.
    pub const fn new(
        backend: B,
        keys: MerchantKeys,
        serviceability: ServiceabilityChecker<P>,
        shipments: ShipmentCreator<P>,
    ) -> Self {
        Self {
            backend,
            keys,
            serviceability,
            shipments,
        }
    }

    /// The serviceability checker, shared with the checkout page's
    /// pincode probe.
    pub const fn serviceability(&self) -> &ServiceabilityChecker<P> {
        &self.serviceability
    }

    /// Run the precondition gates and mint a payment order.
    ///
    /// Gate order: authentication, address presence, address
    /// completeness, serviceability, cart non-empty, payment config,
    /// payment order creation.
    ///
    /// # Errors
    ///
    /// The first failing gate, as a customer-facing [`CheckoutError`].
    #[instrument(skip_all, fields(return_to = %return_to))]
    pub async fn begin(
        &self,
        user: Option<&CurrentUser>,
        book: &AddressBook,
        cart: &Cart,
        return_to: &str,
    ) -> Result<PaymentSession, CheckoutError> {
        // 1. Authentication
        let user = user.ok_or_else(|| CheckoutError::NotAuthenticated {
            return_to: return_to.to_owned(),
        })?;

        // 2. Address presence and completeness
        let address = book.selected().ok_or(CheckoutError::MissingAddress)?;
        address.validate().map_err(CheckoutError::InvalidAddress)?;

        // 3. Serviceability (cached; closed failure)
        match self.serviceability.check(&address.pincode).await {
            Some(result) if result.is_serviceable => {}
            Some(result) => {
                return Err(CheckoutError::NotServiceable {
                    reason: result.message,
                });
            }
            // Unreachable after validate(), but the gate stays closed
            None => {
                return Err(CheckoutError::NotServiceable {
                    reason: "pincode not checkable".to_owned(),
                });
            }
        }

        // 4. Cart non-empty
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // 5. Payment configuration
        let key = self
            .keys
            .ensure()
            .await
            .map_err(|_| CheckoutError::PaymentUnavailable)?;

        // 6. Payment order
        let amount = cart.total().to_paise().ok_or(CheckoutError::InvalidAmount)?;
        let request = CreatePaymentOrderRequest {
            amount,
            currency: Money::CURRENCY.to_owned(),
            receipt: receipt_nonce(),
            items: cart.items().to_vec(),
            address: address.clone(),
        };
        let order = self
            .backend
            .create_payment_order(&request)
            .await
            .map_err(CheckoutError::PaymentOrder)?;

        // 7. Widget payload for the browser handoff
        let options = CheckoutOptions::build(&key, &order, user, address, cart);

        Ok(PaymentSession { order, options })
    }

    /// Verify the payment and finish the order.
    ///
    /// Verification failure is terminal: nothing is persisted and no
    /// shipment is attempted. After a verified payment, order persistence
    /// and the shipment-tracking update are best-effort - a paid order is
    /// never failed for them.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::VerificationFailed`] when the backend rejects the
    /// signature, [`CheckoutError::Verification`] when it cannot be
    /// reached.
    #[instrument(skip_all, fields(order_id = %confirmation.order_id))]
    pub async fn complete(
        &self,
        confirmation: &PaymentConfirmation,
        user: &CurrentUser,
        book: &AddressBook,
        cart: &Cart,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let address = book.selected().ok_or(CheckoutError::MissingAddress)?;

        // Verify server-side before anything is persisted
        let verification = self
            .backend
            .verify_payment(&VerifyPaymentRequest {
                order_id: confirmation.order_id.clone(),
                payment_id: confirmation.payment_id.clone(),
                signature: confirmation.signature.clone(),
                cart_items: cart.items().to_vec(),
                address: address.clone(),
            })
            .await
            .map_err(CheckoutError::Verification)?;

        if !verification.success {
            warn!(
                message = verification.message.as_deref().unwrap_or(""),
                "payment verification rejected"
            );
            return Err(CheckoutError::VerificationFailed);
        }

        // Persist the order. Best-effort: the payment is already captured,
        // so a persistence failure must not fail the customer.
        let record = OrderRecord {
            order_id: confirmation.order_id.clone(),
            payment_id: confirmation.payment_id.clone(),
            amount: cart.total(),
            currency: Money::CURRENCY.to_owned(),
            customer: OrderCustomer {
                user_id: Some(user.id.clone()),
                name: address.full_name.clone(),
                email: user.email.clone(),
                phone: address.phone.clone(),
            },
            shipping_address: address.into(),
            items: cart.items().iter().map(OrderLineItem::from).collect(),
        };
        if let Err(err) = self.backend.create_order(&record).await {
            warn!(error = %err, "order persistence failed after verified payment");
        }

        // Shipment. Never fails; worst case is the pending sentinel.
        let outcome = self
            .shipments
            .create(&ShipmentRequest {
                order_id: confirmation.order_id.clone(),
                customer: user.clone(),
                address: address.clone(),
                items: cart.items().to_vec(),
                sub_total: cart.total(),
            })
            .await;

        let update = ShipmentUpdate {
            order_id: confirmation.order_id.clone(),
            waybill: outcome.tracking.value(),
            courier: outcome
                .courier
                .clone()
                .unwrap_or_else(|| DEFAULT_COURIER.to_owned()),
            status: outcome.status().to_owned(),
        };
        if let Err(err) = self.backend.update_shipment(&update).await {
            warn!(error = %err, "shipment tracking update failed");
        }

        Ok(CheckoutOutcome {
            order_id: confirmation.order_id.clone(),
            payment_id: confirmation.payment_id.clone(),
            tracking: outcome.tracking.customer_facing(),
        })
    }
}

/// Receipt nonce, unique per checkout attempt.
fn receipt_nonce() -> String {
    let suffix = Alphanumeric.sample_string(&mut rand::rng(), 9);
    format!("order_{}_{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_nonces_are_unique() {
        let a = receipt_nonce();
        let b = receipt_nonce();
        assert!(a.starts_with("order_"));
        assert_ne!(a, b);
    }
}
