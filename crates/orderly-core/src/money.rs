//! # Money Module
//!
//! Provides the `Money` type: an exact decimal amount paired with a currency.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    0.10 added ten times ≠ 1.00                                          │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    96-bit mantissa + base-10 scale, every addition is exact             │
//! │    0.10 × 10 additions == 1.00  ✅                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Currency Rules
//! Addition is only defined between values of the same currency. Adding
//! USD to EUR is a [`MoneyError::CurrencyMismatch`], never a silent
//! conversion.
//!
//! ## Usage
//! ```rust
//! use orderly_core::money::{Currency, Money};
//!
//! let a = Money::parse("10.00", Currency::USD).unwrap();
//! let b = Money::parse("5.50", Currency::USD).unwrap();
//! let sum = a.checked_add(&b).unwrap();
//! assert_eq!(sum.to_string(), "15.50 USD");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::MoneyError;

// =============================================================================
// Currency
// =============================================================================

/// A three-letter ISO-style currency code (`USD`, `EUR`, ...).
///
/// Stored inline as ASCII bytes so `Money` stays `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    /// The reference currency for monetary defaults.
    pub const USD: Currency = Currency(*b"USD");
    pub const EUR: Currency = Currency(*b"EUR");

    pub fn code(&self) -> &str {
        // Only constructed from validated ASCII uppercase bytes.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let bytes = code.as_bytes();
        match bytes {
            [a, b, c] if bytes.iter().all(u8::is_ascii_uppercase) => Ok(Currency([*a, *b, *c])),
            _ => Err(MoneyError::InvalidCurrency(code.to_string())),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// An exact monetary amount in a specific currency.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  LineItem.price × quantity ──► LineItem.total                           │
/// │                                     │                                   │
/// │                                     ▼ (left fold, checked_add)          │
/// │                              Order.item_total ──► Order.total           │
/// │                                                                         │
/// │  Order.adjustment_total / Order.promo_total: stored, not summed (yet)   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Serializes as `{"amount": "15.50", "currency": "USD"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money {
    #[ts(as = "String")]
    amount: Decimal,
    #[ts(as = "String")]
    currency: Currency,
}

impl Money {
    #[inline]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Money { amount, currency }
    }

    /// Zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money::new(Decimal::ZERO, currency)
    }

    /// Parses a decimal string such as `"10.00"` or `"-3.5"`.
    ///
    /// ## Example
    /// ```rust
    /// use orderly_core::money::{Currency, Money};
    ///
    /// assert!(Money::parse("10.99", Currency::USD).is_ok());
    /// assert!(Money::parse("ten", Currency::USD).is_err());
    /// ```
    pub fn parse(amount: &str, currency: Currency) -> Result<Self, MoneyError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;
        Ok(Money::new(amount, currency))
    }

    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Adds two values of the same currency.
    ///
    /// ## Errors
    /// - [`MoneyError::CurrencyMismatch`] when the currencies differ
    /// - [`MoneyError::Overflow`] when the sum leaves the decimal range
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }

        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use orderly_core::money::{Currency, Money};
    ///
    /// let unit = Money::parse("2.99", Currency::USD).unwrap();
    /// let line = unit.multiply_quantity(3).unwrap();
    /// assert_eq!(line.to_string(), "8.97 USD");
    /// ```
    pub fn multiply_quantity(&self, qty: i64) -> Result<Money, MoneyError> {
        let amount = self
            .amount
            .checked_mul(Decimal::from(qty))
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with its own scale followed by the code: `15.50 USD`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Default money is zero in the reference currency.
impl Default for Money {
    fn default() -> Self {
        Money::zero(Currency::USD)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    #[test]
    fn test_parse_and_display() {
        let money = Money::parse("10.99", Currency::USD).unwrap();
        assert_eq!(money.amount(), dec!(10.99));
        assert_eq!(money.to_string(), "10.99 USD");

        assert!(matches!(
            Money::parse("1O.00", Currency::USD),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::EUR);
        assert!("usd".parse::<Currency>().is_err());
        assert!("USDT".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
    }

    #[test]
    fn test_checked_add_same_currency() {
        let sum = usd(dec!(10.00)).checked_add(&usd(dec!(5.50))).unwrap();
        assert_eq!(sum, usd(dec!(15.50)));
    }

    #[test]
    fn test_checked_add_rejects_mixed_currencies() {
        let eur = Money::new(dec!(1.00), Currency::EUR);
        let err = usd(dec!(1.00)).checked_add(&eur).unwrap_err();
        assert_eq!(
            err,
            MoneyError::CurrencyMismatch {
                left: Currency::USD,
                right: Currency::EUR,
            }
        );
    }

    /// Ten additions of 0.10 must land exactly on 1.00.
    #[test]
    fn test_no_drift_on_repeated_addition() {
        let dime = usd(dec!(0.10));
        let mut total = Money::zero(Currency::USD);
        for _ in 0..10 {
            total = total.checked_add(&dime).unwrap();
        }
        assert_eq!(total, usd(dec!(1.00)));
    }

    #[test]
    fn test_multiply_quantity() {
        let line = usd(dec!(2.99)).multiply_quantity(3).unwrap();
        assert_eq!(line.amount(), dec!(8.97));
    }

    #[test]
    fn test_overflow_is_reported() {
        let max = usd(Decimal::MAX);
        assert_eq!(max.checked_add(&max), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_zero_and_sign() {
        assert!(Money::default().is_zero());
        assert_eq!(Money::default().currency(), Currency::USD);
        assert!(usd(dec!(-0.01)).is_negative());
        assert!(!usd(dec!(0)).is_negative());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(usd(dec!(15.50))).unwrap();
        assert_eq!(json, serde_json::json!({"amount": "15.50", "currency": "USD"}));

        let back: Money = serde_json::from_value(json).unwrap();
        assert_eq!(back, usd(dec!(15.50)));

        let bad = serde_json::json!({"amount": "1.00", "currency": "dollars"});
        assert!(serde_json::from_value::<Money>(bad).is_err());
    }
}
