//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are snapshotted into line items at add-time and never re-fetched,
//! so the arithmetic here (line totals, collection totals) is the only place
//! money math happens. Everything is `rust_decimal` to keep cents exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Create a price from a whole number of major units (e.g., dollars).
    #[must_use]
    pub fn from_major(units: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::from(units), currency_code)
    }

    /// Create a price from a number of minor units (e.g., cents).
    #[must_use]
    pub fn from_minor(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::from_i128_with_scale(cents as i128, 2), currency_code)
    }

    /// Multiply the unit price by a line quantity.
    #[must_use]
    pub fn mul_quantity(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Add another price of the same currency.
    ///
    /// Returns `None` if the currencies differ. Collections never mix
    /// currencies in practice, so callers treat `None` as corrupt data.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.currency_code == other.currency_code {
            Some(Self::new(self.amount + other.amount, self.currency_code))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_quantity() {
        let unit = Price::from_minor(1050, CurrencyCode::USD);
        let line = unit.mul_quantity(3);
        assert_eq!(line.amount, Decimal::new(3150, 2));
    }

    #[test]
    fn test_checked_add_same_currency() {
        let a = Price::from_major(10, CurrencyCode::USD);
        let b = Price::from_minor(250, CurrencyCode::USD);
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.amount, Decimal::new(1250, 2));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Price::from_major(10, CurrencyCode::USD);
        let b = Price::from_major(10, CurrencyCode::EUR);
        assert!(a.checked_add(&b).is_none());
    }

    #[test]
    fn test_display() {
        let p = Price::from_minor(1999, CurrencyCode::USD);
        assert_eq!(p.to_string(), "$19.99");
    }

    #[test]
    fn test_zero() {
        assert_eq!(Price::zero(CurrencyCode::USD).amount, Decimal::ZERO);
    }
}
