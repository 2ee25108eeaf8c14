//! Shipping addresses and field-completeness validation.

use serde::{Deserialize, Serialize};

use crate::types::{AddressId, Pincode, PincodeError};

/// Address label chosen by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    #[default]
    Home,
    Work,
    Other,
}

/// Why an address cannot be used for checkout.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The pincode is not a valid six-digit code.
    #[error("invalid pincode: {0}")]
    InvalidPincode(#[from] PincodeError),
}

/// A shipping address.
///
/// The pincode is kept as the raw string the customer typed; validation
/// happens through [`Address::validate`] so an in-progress address can be
/// stored and edited without being checkout-ready.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// Storefront-assigned ID (uuid).
    pub id: AddressId,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    /// Raw pincode as entered; see [`Address::pincode`].
    pub pincode: String,
    pub country: String,
    /// Marked by the customer as their default address.
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, rename = "type")]
    pub kind: AddressKind,
}

impl Address {
    /// Validate field completeness for checkout.
    ///
    /// Every required field must be non-blank and the pincode must be
    /// exactly six digits. Returns the parsed pincode on success so the
    /// caller can go straight to a serviceability lookup.
    ///
    /// # Errors
    ///
    /// Returns the first failing field, in display order.
    pub fn validate(&self) -> Result<Pincode, AddressError> {
        for (name, value) in [
            ("full name", &self.full_name),
            ("phone", &self.phone),
            ("address line 1", &self.address_line1),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(Pincode::parse(&self.pincode)?)
    }

    /// Parse the pincode, if it is currently valid.
    ///
    /// # Errors
    ///
    /// Returns `PincodeError` for anything other than six ASCII digits.
    pub fn pincode(&self) -> Result<Pincode, PincodeError> {
        Pincode::parse(&self.pincode)
    }

    /// Address lines 1 and 2 joined for single-line carrier payloads.
    #[must_use]
    pub fn street(&self) -> String {
        match self.address_line2.as_deref() {
            Some(line2) if !line2.trim().is_empty() => {
                format!("{} {line2}", self.address_line1)
            }
            _ => self.address_line1.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn delhi_address() -> Address {
        Address {
            id: AddressId::new("addr_1"),
            full_name: "Asha Verma".to_owned(),
            phone: "9137532150".to_owned(),
            address_line1: "B-2/79 2nd floor".to_owned(),
            address_line2: Some("Rohini Sector 16".to_owned()),
            city: "Delhi".to_owned(),
            state: "Delhi".to_owned(),
            pincode: "110089".to_owned(),
            country: "India".to_owned(),
            is_default: true,
            kind: AddressKind::Home,
        }
    }

    #[test]
    fn test_validate_complete_address() {
        let pin = delhi_address().validate().unwrap();
        assert_eq!(pin.as_str(), "110089");
    }

    #[test]
    fn test_validate_missing_field() {
        let mut address = delhi_address();
        address.city = "  ".to_owned();
        assert_eq!(
            address.validate(),
            Err(AddressError::MissingField("city"))
        );
    }

    #[test]
    fn test_validate_five_digit_pincode() {
        let mut address = delhi_address();
        address.pincode = "11008".to_owned();
        assert!(matches!(
            address.validate(),
            Err(AddressError::InvalidPincode(PincodeError::WrongLength { len: 5 }))
        ));
    }

    #[test]
    fn test_street_joins_lines() {
        assert_eq!(
            delhi_address().street(),
            "B-2/79 2nd floor Rohini Sector 16"
        );

        let mut address = delhi_address();
        address.address_line2 = None;
        assert_eq!(address.street(), "B-2/79 2nd floor");
    }

    #[test]
    fn test_kind_serde_rename() {
        let json = serde_json::to_string(&delhi_address()).unwrap();
        assert!(json.contains("\"type\":\"home\""));
    }
}
