//! Gateway checkout widget payload.

use serde::{Deserialize, Serialize};

use spotfit_core::{Cart, OrderId};

use crate::api::PaymentOrder;
use crate::models::CurrentUser;

/// Brand accent used by the widget chrome.
const THEME_COLOR: &str = "#c1121f";

/// Store name shown in the widget header.
pub const STORE_NAME: &str = "SpotFit";

/// Construction payload for the gateway's browser checkout widget.
///
/// Field names match the widget's options object verbatim - this struct is
/// serialized straight into the page that opens the widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutOptions {
    /// Merchant key (public identifier).
    pub key: String,
    /// Amount in paise, echoed from the payment order.
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    /// Gateway order handle.
    pub order_id: OrderId,
    pub prefill: Prefill,
    pub notes: OrderItemNote,
    pub theme: Theme,
}

/// Customer details prefilled into the widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Free-form notes attached to the gateway order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItemNote {
    /// First line of the shipping address.
    pub address: String,
    /// JSON summary of the cart lines (title, quantity, size).
    pub order_items: String,
}

/// Widget theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Theme {
    pub color: String,
}

impl CheckoutOptions {
    /// Assemble the widget payload from a minted payment order.
    #[must_use]
    pub fn build(
        key: &str,
        order: &PaymentOrder,
        user: &CurrentUser,
        address: &spotfit_core::Address,
        cart: &Cart,
    ) -> Self {
        #[derive(Serialize)]
        struct ItemSummary<'a> {
            product: &'a str,
            quantity: u32,
            size: Option<&'a str>,
        }

        let summaries: Vec<ItemSummary<'_>> = cart
            .items()
            .iter()
            .map(|item| ItemSummary {
                product: &item.product.title,
                quantity: item.quantity,
                size: item.size.as_deref(),
            })
            .collect();

        Self {
            key: key.to_owned(),
            amount: order.amount,
            currency: order.currency.clone(),
            name: STORE_NAME.to_owned(),
            description: "Order Payment".to_owned(),
            order_id: order.id.clone(),
            prefill: Prefill {
                name: address.full_name.clone(),
                email: user.email.as_str().to_owned(),
                contact: address.phone.clone(),
            },
            notes: OrderItemNote {
                address: address.address_line1.clone(),
                order_items: serde_json::to_string(&summaries).unwrap_or_default(),
            },
            theme: Theme {
                color: THEME_COLOR.to_owned(),
            },
        }
    }
}
