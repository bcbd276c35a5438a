//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// A product price in Brazilian reais.
///
/// All catalog prices are in a single currency, so the wrapper holds just
/// the decimal amount. Construction through [`Price::parse`] guarantees a
/// strictly positive value; arithmetic on cart subtotals goes through
/// [`Price::amount`].
///
/// ## Examples
///
/// ```
/// use maos_de_fada_core::Price;
///
/// let price = Price::parse("12.5").unwrap();
/// assert_eq!(price.display(), "R$ 12.50");
///
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("-3").is_err());
/// assert!(Price::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price from user input.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] if the input is not a decimal,
    /// or [`PriceError::NotPositive`] if the amount is not > 0.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::NotANumber)?;
        Self::from_decimal(amount)
    }

    /// Wrap an already-validated decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if the amount is not > 0.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `R$ 12.50`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_positive_decimals() {
        assert_eq!(Price::parse("45.90").unwrap().display(), "R$ 45.90");
        assert_eq!(Price::parse(" 7 ").unwrap().display(), "R$ 7.00");
    }

    #[test]
    fn parse_rejects_non_positive_and_garbage() {
        assert!(matches!(Price::parse("0"), Err(PriceError::NotPositive)));
        assert!(matches!(Price::parse("-1.5"), Err(PriceError::NotPositive)));
        assert!(matches!(Price::parse("abc"), Err(PriceError::NotANumber)));
        assert!(matches!(Price::parse(""), Err(PriceError::NotANumber)));
    }

    #[test]
    fn display_always_has_two_decimals() {
        assert_eq!(Price::parse("10").unwrap().to_string(), "10.00");
        assert_eq!(Price::parse("10.1").unwrap().to_string(), "10.10");
        assert_eq!(Price::parse("10.129").unwrap().to_string(), "10.13");
    }
}
