//! In-memory fakes for the external collaborators.
//!
//! Both fakes are used behind `Arc` so a test can keep a handle for
//! inspecting recorded calls while the orchestrator owns its copy.

use std::sync::Mutex;

use async_trait::async_trait;

use spotfit_core::Pincode;
use spotfit_storefront::api::{
    ApiError, CreatePaymentOrderRequest, OrderBackend, OrderRecord, PaymentOrder, ShipmentUpdate,
    VerificationOutcome, VerifyPaymentRequest,
};
use spotfit_storefront::shipping::{
    AssignAwbResponse, CarrierOrderResponse, CreateCarrierOrderRequest, PickupLocation,
    ServiceabilityResponse, ShippingError, ShippingProvider,
};

/// Gateway order handle minted by the fake backend.
pub const FAKE_ORDER_ID: &str = "order_fake_1";

/// Provider shipment id used by the fake provider.
pub const FAKE_SHIPMENT_ID: i64 = 8765;

/// Scripted backend order API.
#[derive(Debug)]
pub struct FakeBackend {
    /// Verdict returned by `verify_payment`.
    pub verify_success: bool,
    /// Fail `create_payment_order` with an API error.
    pub fail_create_payment_order: bool,
    /// Fail `create_order` with an API error (persistence outage).
    pub fail_create_order: bool,
    /// Fail `update_shipment` with an API error.
    pub fail_update_shipment: bool,

    pub payment_orders: Mutex<Vec<CreatePaymentOrderRequest>>,
    pub verifications: Mutex<Vec<VerifyPaymentRequest>>,
    pub orders: Mutex<Vec<OrderRecord>>,
    pub shipment_updates: Mutex<Vec<ShipmentUpdate>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            verify_success: true,
            fail_create_payment_order: false,
            fail_create_order: false,
            fail_update_shipment: false,
            payment_orders: Mutex::new(Vec::new()),
            verifications: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            shipment_updates: Mutex::new(Vec::new()),
        }
    }
}

fn api_outage(what: &str) -> ApiError {
    ApiError::Api {
        status: 500,
        message: format!("{what} unavailable"),
    }
}

#[async_trait]
impl OrderBackend for FakeBackend {
    async fn create_payment_order(
        &self,
        request: &CreatePaymentOrderRequest,
    ) -> Result<PaymentOrder, ApiError> {
        if self.fail_create_payment_order {
            return Err(api_outage("payment order"));
        }
        self.payment_orders
            .lock()
            .expect("lock poisoned")
            .push(request.clone());
        Ok(PaymentOrder {
            id: FAKE_ORDER_ID.into(),
            amount: request.amount,
            currency: request.currency.clone(),
        })
    }

    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerificationOutcome, ApiError> {
        self.verifications
            .lock()
            .expect("lock poisoned")
            .push(request.clone());
        Ok(VerificationOutcome {
            success: self.verify_success,
            message: (!self.verify_success).then(|| "signature mismatch".to_owned()),
        })
    }

    async fn create_order(&self, order: &OrderRecord) -> Result<(), ApiError> {
        if self.fail_create_order {
            return Err(api_outage("order persistence"));
        }
        self.orders.lock().expect("lock poisoned").push(order.clone());
        Ok(())
    }

    async fn update_shipment(&self, update: &ShipmentUpdate) -> Result<(), ApiError> {
        if self.fail_update_shipment {
            return Err(api_outage("shipment update"));
        }
        self.shipment_updates
            .lock()
            .expect("lock poisoned")
            .push(update.clone());
        Ok(())
    }
}

/// Scripted shipping provider.
#[derive(Debug)]
pub struct FakeProvider {
    /// Pincodes are deliverable.
    pub serviceable: bool,
    /// Pickup-location listing; `None` makes the listing call fail.
    pub listing: Option<Vec<String>>,
    /// Locations `create_order` accepts.
    pub accepts: Vec<String>,
    /// Names returned as `available_locations` on each rejection.
    pub discovers: Vec<String>,
    /// AWB present directly on the order-creation response.
    pub awb_on_create: Option<String>,
    /// AWB returned by assignment; `None` makes assignment fail.
    pub awb_on_assign: Option<String>,

    /// Pickup locations tried by `create_order`, in order.
    pub attempted_locations: Mutex<Vec<String>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            serviceable: true,
            listing: Some(vec!["Primary".to_owned()]),
            accepts: vec!["Primary".to_owned()],
            discovers: Vec::new(),
            awb_on_create: None,
            awb_on_assign: Some("AWB123".to_owned()),
            attempted_locations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ShippingProvider for FakeProvider {
    async fn check_pincode(
        &self,
        _pincode: &Pincode,
    ) -> Result<ServiceabilityResponse, ShippingError> {
        Ok(ServiceabilityResponse {
            available: self.serviceable,
            estimated_days: None,
            courier_name: None,
            reason: (!self.serviceable).then(|| "no courier serves this pincode".to_owned()),
        })
    }

    async fn pickup_locations(&self) -> Result<Vec<PickupLocation>, ShippingError> {
        match &self.listing {
            Some(names) => Ok(names
                .iter()
                .map(|name| PickupLocation {
                    pickup_location: name.clone(),
                    address: None,
                    city: None,
                    pin_code: None,
                    phone: None,
                })
                .collect()),
            None => Err(ShippingError::Parse("listing unavailable".to_owned())),
        }
    }

    async fn create_order(
        &self,
        request: &CreateCarrierOrderRequest,
    ) -> Result<CarrierOrderResponse, ShippingError> {
        self.attempted_locations
            .lock()
            .expect("lock poisoned")
            .push(request.pickup_location.clone());

        if !self.accepts.contains(&request.pickup_location) {
            return Err(ShippingError::Api {
                status: 422,
                message: "Wrong Pickup location entered.".to_owned(),
                available_locations: self.discovers.clone(),
            });
        }

        Ok(CarrierOrderResponse {
            order_id: 4321,
            shipment_id: FAKE_SHIPMENT_ID,
            status: "NEW".to_owned(),
            awb_code: self.awb_on_create.clone().unwrap_or_default(),
            courier_company_id: Some(51),
            courier_name: Some("Delhivery".to_owned()),
        })
    }

    async fn assign_awb(
        &self,
        _shipment_id: i64,
        _courier_id: Option<i64>,
    ) -> Result<AssignAwbResponse, ShippingError> {
        match &self.awb_on_assign {
            Some(awb) => Ok(AssignAwbResponse {
                awb_code: awb.clone(),
                courier_id: Some(51),
                courier_name: Some("Delhivery".to_owned()),
                status: "ASSIGNED".to_owned(),
            }),
            None => Err(ShippingError::Api {
                status: 500,
                message: "AWB assignment failed".to_owned(),
                available_locations: Vec::new(),
            }),
        }
    }
}
