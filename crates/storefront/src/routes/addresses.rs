//! Address route handlers.

use axum::{
    Json,
    extract::Path,
    http::StatusCode,
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use spotfit_core::{Address, AddressId};

use crate::error::{AppError, Result};
use crate::store::{AddressBook, AddressInput};

/// Address book payload: all addresses plus the selected ID.
#[derive(Debug, Serialize)]
pub struct AddressBookView {
    pub addresses: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<AddressId>,
}

impl From<&AddressBook> for AddressBookView {
    fn from(book: &AddressBook) -> Self {
        Self {
            addresses: book.addresses().to_vec(),
            selected_id: book.selected().map(|a| a.id.clone()),
        }
    }
}

/// List addresses and the current selection.
#[instrument(skip(session))]
pub async fn index(session: Session) -> Result<Json<AddressBookView>> {
    let book = AddressBook::load(&session).await;
    Ok(Json(AddressBookView::from(&book)))
}

/// Create an address. The first one (or a default-flagged one) becomes
/// selected.
#[instrument(skip(session, input), fields(city = %input.city))]
pub async fn create(
    session: Session,
    Json(input): Json<AddressInput>,
) -> Result<(StatusCode, Json<AddressBookView>)> {
    let mut book = AddressBook::load(&session).await;
    book.add(input);
    book.save(&session).await?;

    Ok((StatusCode::CREATED, Json(AddressBookView::from(&book))))
}

/// Update an address's fields.
#[instrument(skip(session, input), fields(address_id = %id))]
pub async fn update(
    session: Session,
    Path(id): Path<AddressId>,
    Json(input): Json<AddressInput>,
) -> Result<Json<AddressBookView>> {
    let mut book = AddressBook::load(&session).await;
    if !book.update(&id, input) {
        return Err(AppError::NotFound(format!("address {id}")));
    }
    book.save(&session).await?;

    Ok(Json(AddressBookView::from(&book)))
}

/// Delete an address. Deleting the selected one falls back to the first
/// remaining address.
#[instrument(skip(session), fields(address_id = %id))]
pub async fn delete(
    session: Session,
    Path(id): Path<AddressId>,
) -> Result<Json<AddressBookView>> {
    let mut book = AddressBook::load(&session).await;
    if !book.delete(&id) {
        return Err(AppError::NotFound(format!("address {id}")));
    }
    book.save(&session).await?;

    Ok(Json(AddressBookView::from(&book)))
}

/// Select an address, deselecting the previous one.
#[instrument(skip(session), fields(address_id = %id))]
pub async fn select(
    session: Session,
    Path(id): Path<AddressId>,
) -> Result<Json<AddressBookView>> {
    let mut book = AddressBook::load(&session).await;
    if !book.select(&id) {
        return Err(AppError::NotFound(format!("address {id}")));
    }
    book.save(&session).await?;

    Ok(Json(AddressBookView::from(&book)))
}
