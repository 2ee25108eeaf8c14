//! Type-safe money representation using decimal arithmetic.
//!
//! The storefront sells in a single market, so [`Money`] is always INR.
//! Catalog prices are whole rupees; the payment gateway wants paise.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// An INR amount in rupees.
///
/// Wraps [`Decimal`] so cart totals never go through floating point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// ISO 4217 code for every amount in the system.
    pub const CURRENCY: &'static str = "INR";

    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from whole rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount in rupees.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Apply a percentage discount, flooring to whole rupees.
    ///
    /// The floor is deliberate and applied uniformly: a ₹1000 item at 10%
    /// off costs ₹900, and a ₹999 item at 10% off costs ₹899 (not ₹899.1,
    /// not ₹900).
    #[must_use]
    pub fn discounted(&self, percent: u8) -> Self {
        if percent == 0 {
            return *self;
        }
        let cut = self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED;
        Self((self.0 - cut).floor())
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Convert to paise (the gateway's smallest currency unit).
    ///
    /// Returns `None` if the amount does not fit in an `i64` of paise,
    /// which no real cart total does.
    #[must_use]
    pub fn to_paise(&self) -> Option<i64> {
        (self.0 * Decimal::ONE_HUNDRED).trunc().to_i64()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\u{20b9}{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_floors_to_whole_rupees() {
        // 1000 at 10% -> 900 exactly
        assert_eq!(
            Money::from_rupees(1000).discounted(10),
            Money::from_rupees(900)
        );
        // 999 at 10% -> 899.1 floored to 899
        assert_eq!(
            Money::from_rupees(999).discounted(10),
            Money::from_rupees(899)
        );
    }

    #[test]
    fn test_zero_discount_is_identity() {
        let price = Money::from_rupees(1299);
        assert_eq!(price.discounted(0), price);
    }

    #[test]
    fn test_times_and_sum() {
        let line = Money::from_rupees(900).times(2);
        assert_eq!(line, Money::from_rupees(1800));

        let total: Money = [Money::from_rupees(100), Money::from_rupees(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_rupees(350));
    }

    #[test]
    fn test_to_paise() {
        assert_eq!(Money::from_rupees(900).to_paise(), Some(90_000));
        assert_eq!(Money::ZERO.to_paise(), Some(0));
    }

    #[test]
    fn test_serde_transparent() {
        let price = Money::from_rupees(1000);
        let json = serde_json::to_string(&price).unwrap();
        let parsed: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
