//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues. Server prices arrive in several shapes (a JSON number,
//! a numeric string, or a `{"$numberDecimal": "..."}` wrapper); [`RawPrice`]
//! accepts all of them and [`RawPrice::to_money`] is the single place they are
//! converted.

use crate::CommerceError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    INR,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::INR => "INR",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::INR => "\u{20b9}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    fn minor_units(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl FromStr for Currency {
    type Err = CommerceError;

    /// Case-insensitive ISO code.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim().to_ascii_uppercase();
        [
            Currency::USD,
            Currency::EUR,
            Currency::GBP,
            Currency::JPY,
            Currency::CAD,
            Currency::AUD,
            Currency::INR,
        ]
        .into_iter()
        .find(|c| c.code() == code)
        .ok_or_else(|| CommerceError::ValidationError(format!("unknown currency {}", code)))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from an exact decimal amount.
    ///
    /// Rounds half away from zero to the currency's minor unit.
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use store_commerce::money::{Currency, Money};
    ///
    /// let price = Money::from_decimal(Decimal::new(4999, 2), Currency::USD).unwrap();
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Result<Self, CommerceError> {
        let rounded = amount.round_dp_with_strategy(
            currency.decimal_places(),
            RoundingStrategy::MidpointAwayFromZero,
        );
        let cents = rounded
            .checked_mul(Decimal::from(currency.minor_units()))
            .and_then(|d| d.to_i64())
            .ok_or(CommerceError::Overflow)?;
        Ok(Self::new(cents, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Convert to an exact decimal value.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount_cents, self.currency.decimal_places())
    }

    /// Convert to a float for JSON payloads that expect a plain number.
    pub fn to_f64(&self) -> f64 {
        self.to_decimal().to_f64().unwrap_or_default()
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Apply a decimal rate (e.g. `0.15` for 15% tax), rounding to the minor unit.
    pub fn apply_rate(&self, rate: Decimal) -> Result<Money, CommerceError> {
        let scaled = self
            .to_decimal()
            .checked_mul(rate)
            .ok_or(CommerceError::Overflow)?;
        Money::from_decimal(scaled, self.currency)
    }

    /// Sum an iterator of Money values.
    ///
    /// Returns None if any value is in a different currency or the sum overflows.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A price exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// A plain JSON number.
    Number(f64),
    /// A numeric string.
    Text(String),
    /// A decimal wrapper object.
    Decimal {
        #[serde(rename = "$numberDecimal")]
        number_decimal: String,
    },
}

impl RawPrice {
    /// Normalize into [`Money`].
    pub fn to_money(&self, currency: Currency) -> Result<Money, CommerceError> {
        let amount = match self {
            RawPrice::Number(n) => Decimal::try_from(*n)
                .map_err(|_| CommerceError::InvalidPrice(n.to_string()))?,
            RawPrice::Text(s) | RawPrice::Decimal { number_decimal: s } => {
                Decimal::from_str(s.trim()).map_err(|_| CommerceError::InvalidPrice(s.clone()))?
            }
        };

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CommerceError::InvalidPrice(amount.to_string()));
        }

        Money::from_decimal(amount, currency)
    }
}

impl From<Money> for RawPrice {
    fn from(money: Money) -> Self {
        RawPrice::Number(money.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.amount_cents, 4999);
        assert_eq!(m.currency, Currency::USD);
    }

    #[test]
    fn test_money_from_decimal_rounds_half_away_from_zero() {
        let m = Money::from_decimal(Decimal::new(10005, 3), Currency::USD).unwrap();
        assert_eq!(m.amount_cents, 1001);

        let m = Money::from_decimal(Decimal::new(100, 0), Currency::JPY).unwrap();
        assert_eq!(m.amount_cents, 100);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(500, Currency::USD).display(), "$5.00");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_money_checked_arithmetic() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(300, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1300);
        assert_eq!(a.try_multiply(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::USD).try_multiply(2).is_none());
        assert_eq!(
            Money::try_sum([a, b].iter(), Currency::USD),
            Some(Money::new(1300, Currency::USD))
        );
        assert_eq!(
            Money::try_sum(std::iter::empty(), Currency::USD),
            Some(Money::zero(Currency::USD))
        );
    }

    #[test]
    fn test_money_currency_mismatch() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.try_add(&eur).is_none());
        assert!(Money::try_sum([usd, eur].iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_apply_rate() {
        let m = Money::new(2999, Currency::USD);
        let tax = m.apply_rate(Decimal::new(15, 2)).unwrap();
        // 29.99 * 0.15 = 4.4985
        assert_eq!(tax.amount_cents, 450);
    }

    #[test]
    fn test_raw_price_shapes_normalize_identically() {
        let shapes = [
            r#"19.99"#,
            r#""19.99""#,
            r#"{"$numberDecimal":"19.99"}"#,
        ];

        for json in shapes {
            let raw: RawPrice = serde_json::from_str(json).unwrap();
            let money = raw.to_money(Currency::USD).unwrap();
            assert_eq!(money.amount_cents, 1999, "shape {json}");
        }
    }

    #[test]
    fn test_raw_price_rejects_garbage() {
        let raw = RawPrice::Text("free".to_string());
        assert!(matches!(
            raw.to_money(Currency::USD),
            Err(CommerceError::InvalidPrice(_))
        ));

        let raw = RawPrice::Number(-5.0);
        assert!(raw.to_money(Currency::USD).is_err());
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(" eur ".parse::<Currency>().unwrap(), Currency::EUR);
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
