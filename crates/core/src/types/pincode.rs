//! Indian postal code (PIN code) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Pincode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PincodeError {
    /// The input is not exactly six characters long.
    #[error("pincode must be exactly 6 digits (got {len} characters)")]
    WrongLength {
        /// Length of the rejected input.
        len: usize,
    },
    /// The input contains a non-digit character.
    #[error("pincode must contain only digits")]
    NonDigit,
}

/// A six-digit Indian postal code.
///
/// Serviceability lookups and shipment creation are keyed by pincode, so
/// this type guarantees the "exactly 6 ASCII digits" invariant once at the
/// boundary instead of re-checking it at every call site.
///
/// ## Examples
///
/// ```
/// use spotfit_core::Pincode;
///
/// assert!(Pincode::parse("110089").is_ok());
/// assert!(Pincode::parse("1100").is_err());    // too short
/// assert!(Pincode::parse("11008a").is_err());  // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Required length of a pincode.
    pub const LENGTH: usize = 6;

    /// Parse a `Pincode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly six ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PincodeError> {
        if s.len() != Self::LENGTH {
            return Err(PincodeError::WrongLength { len: s.len() });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PincodeError::NonDigit);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the pincode as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Pincode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Pincode {
    type Err = PincodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Pincode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Pincode::parse("560029").unwrap().as_str(), "560029");
        assert_eq!(Pincode::parse("110089").unwrap().as_str(), "110089");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Pincode::parse("11008"),
            Err(PincodeError::WrongLength { len: 5 })
        ));
        assert!(matches!(
            Pincode::parse("1100890"),
            Err(PincodeError::WrongLength { len: 7 })
        ));
        assert!(matches!(
            Pincode::parse(""),
            Err(PincodeError::WrongLength { len: 0 })
        ));
    }

    #[test]
    fn test_parse_non_digit() {
        assert!(matches!(
            Pincode::parse("11008a"),
            Err(PincodeError::NonDigit)
        ));
        assert!(matches!(
            Pincode::parse("11 089"),
            Err(PincodeError::NonDigit)
        ));
    }

    #[test]
    fn test_from_str() {
        let pin: Pincode = "560029".parse().unwrap();
        assert_eq!(pin.to_string(), "560029");
    }
}
