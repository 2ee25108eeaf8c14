//! Session-backed address book.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tower_sessions::Session;
use uuid::Uuid;

use spotfit_core::{Address, AddressId, AddressKind};

use crate::models::session_keys;

use super::StoreError;

/// Address fields as submitted by the customer (no ID yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInput {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, rename = "type")]
    pub kind: AddressKind,
}

fn default_country() -> String {
    "India".to_owned()
}

impl AddressInput {
    fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            full_name: self.full_name,
            phone: self.phone,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            country: self.country,
            is_default: self.is_default,
            kind: self.kind,
        }
    }
}

/// One customer's addresses plus the single selected address.
///
/// Invariant: at most one address is selected at a time, and the selected
/// ID always refers to an address in the list. Selection survives across
/// sessions via its own session key.
#[derive(Debug)]
pub struct AddressBook {
    addresses: Vec<Address>,
    selected: Option<AddressId>,
    tx: watch::Sender<Option<Address>>,
}

impl AddressBook {
    /// Create a book from parts, repairing a dangling selection.
    ///
    /// With no stored selection, falls back to the default-flagged address,
    /// then the first one - the same repair a fresh browser profile does.
    #[must_use]
    pub fn new(addresses: Vec<Address>, selected: Option<AddressId>) -> Self {
        let selected = selected
            .filter(|id| addresses.iter().any(|a| a.id == *id))
            .or_else(|| {
                addresses
                    .iter()
                    .find(|a| a.is_default)
                    .or_else(|| addresses.first())
                    .map(|a| a.id.clone())
            });

        let initial = selected
            .as_ref()
            .and_then(|id| addresses.iter().find(|a| a.id == *id).cloned());
        let (tx, _rx) = watch::channel(initial);

        Self {
            addresses,
            selected,
            tx,
        }
    }

    /// Load the address book from the session.
    ///
    /// Corrupt blobs are discarded.
    pub async fn load(session: &Session) -> Self {
        let addresses = match session.get::<Vec<Address>>(session_keys::ADDRESSES).await {
            Ok(Some(addresses)) => addresses,
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt address blob");
                Vec::new()
            }
        };
        let selected = session
            .get::<AddressId>(session_keys::SELECTED_ADDRESS)
            .await
            .ok()
            .flatten();

        Self::new(addresses, selected)
    }

    /// Persist the address book to the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Session`] if the session backend refuses a
    /// write.
    pub async fn save(&self, session: &Session) -> Result<(), StoreError> {
        session
            .insert(session_keys::ADDRESSES, &self.addresses)
            .await?;
        match &self.selected {
            Some(id) => {
                session.insert(session_keys::SELECTED_ADDRESS, id).await?;
            }
            None => {
                session
                    .remove::<AddressId>(session_keys::SELECTED_ADDRESS)
                    .await?;
            }
        }
        Ok(())
    }

    /// All addresses, in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The selected address, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Address> {
        self.selected
            .as_ref()
            .and_then(|id| self.addresses.iter().find(|a| a.id == *id))
    }

    /// Subscribe to selected-address changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.tx.subscribe()
    }

    /// Add an address, minting a fresh ID.
    ///
    /// The first address added - or any address flagged as default - is
    /// selected automatically.
    pub fn add(&mut self, input: AddressInput) -> AddressId {
        let id = AddressId::new(Uuid::new_v4().to_string());
        let auto_select = self.addresses.is_empty() || input.is_default;
        self.addresses.push(input.into_address(id.clone()));

        if auto_select {
            self.selected = Some(id.clone());
        }
        self.publish();
        id
    }

    /// Replace an address's fields, keeping its ID.
    ///
    /// Returns `false` if no address has that ID.
    pub fn update(&mut self, id: &AddressId, input: AddressInput) -> bool {
        let Some(slot) = self.addresses.iter_mut().find(|a| a.id == *id) else {
            return false;
        };
        *slot = input.into_address(id.clone());
        self.publish();
        true
    }

    /// Select an address, deselecting the previous one.
    ///
    /// Returns `false` if no address has that ID.
    pub fn select(&mut self, id: &AddressId) -> bool {
        if !self.addresses.iter().any(|a| a.id == *id) {
            return false;
        }
        self.selected = Some(id.clone());
        self.publish();
        true
    }

    /// Delete an address.
    ///
    /// Deleting the selected address falls back to the first remaining
    /// one. Returns `false` if no address has that ID.
    pub fn delete(&mut self, id: &AddressId) -> bool {
        let before = self.addresses.len();
        self.addresses.retain(|a| a.id != *id);
        if self.addresses.len() == before {
            return false;
        }

        if self.selected.as_ref() == Some(id) {
            self.selected = self.addresses.first().map(|a| a.id.clone());
        }
        self.publish();
        true
    }

    fn publish(&self) {
        self.tx.send_replace(self.selected().cloned());
    }
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}
