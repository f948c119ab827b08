//! Price representation using decimal arithmetic.
//!
//! The store trades in a single currency (Egyptian pound). Catalog prices
//! and delivery fees are whole pounds in practice, but the type keeps
//! decimal precision so fractional promotions do not silently truncate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Egyptian pounds (EGP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// ISO 4217 code for the store currency.
    pub const CURRENCY_CODE: &'static str = "EGP";

    /// Create a price from a decimal amount of pounds.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of pounds.
    #[must_use]
    pub fn from_pounds(pounds: u32) -> Self {
        Self(Decimal::from(pounds))
    }

    /// The zero price.
    #[must_use]
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the decimal amount in pounds.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Whole pounds render without a fraction ("75"), anything else
        // keeps its scale ("74.50").
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_pounds_display() {
        assert_eq!(Price::from_pounds(75).to_string(), "75");
        assert_eq!(Price::zero().to_string(), "0");
    }

    #[test]
    fn test_fractional_display() {
        let price = Price::new(Decimal::new(7450, 2));
        assert_eq!(price.to_string(), "74.5");
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_pounds(60) < Price::from_pounds(75));
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::from_pounds(80);
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, back);
    }
}
