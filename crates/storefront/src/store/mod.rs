//! Session-persisted state stores.
//!
//! Each customer's cart, address list, and selected address live in their
//! session as JSON blobs under fixed `spotfit_*` keys - the server-side
//! equivalent of the browser local storage a single-page storefront would
//! use. A store is loaded at the top of a request, mutated, and saved
//! back; every mutation also broadcasts a snapshot on a watch channel so
//! long-lived owners (and tests) can observe changes.
//!
//! Corrupt persisted state is discarded rather than surfaced: a cart that
//! fails to deserialize becomes an empty cart, matching how a browser
//! client recovers from a bad local-storage blob.

pub mod address;
pub mod cart;

pub use address::{AddressBook, AddressInput};
pub use cart::CartStore;

use thiserror::Error;

/// Errors persisting store state to the session.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The session backend refused the write.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
