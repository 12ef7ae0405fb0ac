//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major currency units (e.g., 1250.50).
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "INR", "USD").
    pub currency: CurrencyCode,
}

/// An ISO 4217 alphabetic currency code.
///
/// Always three uppercase ASCII letters. Pricing records are configured per
/// country, so the set of codes is open rather than a fixed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, String> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(format!("Unknown currency: {code}"))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns a copy with the amount replaced, keeping the currency.
    #[must_use]
    pub fn with_amount(&self, amount: Decimal) -> Self {
        Self {
            amount,
            currency: self.currency.clone(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn inr() -> CurrencyCode {
        CurrencyCode::parse("INR").unwrap()
    }

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, inr());
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency.as_str(), "INR");
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(inr());
        assert!(money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_money_is_negative() {
        assert!(!Money::new(dec!(10), inr()).is_negative());
        assert!(Money::new(dec!(-10), inr()).is_negative());
    }

    #[test]
    fn test_with_amount_keeps_currency() {
        let money = Money::new(dec!(10), inr()).with_amount(dec!(8));
        assert_eq!(money.amount, dec!(8));
        assert_eq!(money.currency, inr());
    }

    #[test]
    fn test_currency_code_normalizes() {
        assert_eq!(CurrencyCode::from_str("usd").unwrap().as_str(), "USD");
        assert_eq!(CurrencyCode::from_str(" inr ").unwrap().as_str(), "INR");
    }

    #[test]
    fn test_currency_code_rejects_bad_input() {
        assert!(CurrencyCode::from_str("").is_err());
        assert!(CurrencyCode::from_str("US").is_err());
        assert!(CurrencyCode::from_str("US1").is_err());
        assert!(CurrencyCode::from_str("EURO").is_err());
    }

    #[test]
    fn test_currency_code_serde() {
        let json = serde_json::to_string(&inr()).unwrap();
        assert_eq!(json, "\"INR\"");
        let parsed: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(parsed.as_str(), "EUR");
        assert!(serde_json::from_str::<CurrencyCode>("\"EURO\"").is_err());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(dec!(12.50), inr()).to_string(), "12.50 INR");
    }
}
