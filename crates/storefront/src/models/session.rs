//! Session-related types.
//!
//! The session is the server-side stand-in for what the old site kept in
//! browser local storage, so the keys keep the same fixed `spotfit_*`
//! names.

use serde::{Deserialize, Serialize};

use spotfit_core::{Email, UserId, UserRole};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role; admins may use the product-entry endpoint.
    #[serde(default)]
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether this user may manage the catalog.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Fixed session keys for persisted per-customer state.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "spotfit_user";

    /// Key for the cart JSON blob.
    pub const CART: &str = "spotfit_cart";

    /// Key for the address list JSON blob.
    pub const ADDRESSES: &str = "spotfit_addresses";

    /// Key for the selected address ID.
    pub const SELECTED_ADDRESS: &str = "spotfit_selected_address";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_roundtrip() {
        let user = CurrentUser {
            id: UserId::new("user_1"),
            email: Email::parse("asha@example.com").unwrap(),
            name: "Asha".to_owned(),
            role: UserRole::Customer,
        };

        let json = serde_json::to_string(&user).unwrap();
        let parsed: CurrentUser = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, user.id);
        assert!(!parsed.is_admin());
    }

    #[test]
    fn test_role_defaults_to_customer() {
        // Older sessions predate the role field.
        let json = r#"{"id":"user_1","email":"asha@example.com","name":"Asha"}"#;
        let parsed: CurrentUser = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.role, UserRole::Customer);
    }
}
