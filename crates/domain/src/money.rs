//! Exact decimal money.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Number of fraction digits kept by computed amounts.
pub const CENT_DIGITS: u32 = 2;

/// Raised when a raw value is not a decimal number, or when arithmetic on
/// amounts leaves the representable range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid monetary amount: {raw}")]
pub struct InvalidMoney {
    /// The rejected input or expression, rendered as text.
    pub raw: String,
}

/// Money amount backed by an exact decimal.
///
/// Parsed amounts keep the precision they were given. Computed amounts
/// ([`Money::multiply_and_round`], [`Money::sum_and_round`]) always carry
/// exactly two fraction digits, rounded half away from zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount as is.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, CENT_DIGITS))
    }

    /// Parses a JSON number or string.
    ///
    /// Numbers are read through their decimal text so `4299.99` stays exactly
    /// `4299.99`. Anything other than a number or a numeric string fails.
    pub fn parse(raw: &Value) -> Result<Self, InvalidMoney> {
        match raw {
            Value::Number(number) => Self::parse_str(&number.to_string()),
            Value::String(text) => Self::parse_str(text),
            other => Err(InvalidMoney {
                raw: other.to_string(),
            }),
        }
    }

    /// Parses a decimal literal, with or without an exponent.
    ///
    /// Only signs, digits, one decimal point and an exponent marker are
    /// accepted; digit separators such as `1_000` are rejected.
    pub fn parse_str(raw: &str) -> Result<Self, InvalidMoney> {
        if !is_decimal_literal(raw) {
            return Err(InvalidMoney {
                raw: raw.to_string(),
            });
        }
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map(Self)
            .map_err(|_| InvalidMoney {
                raw: raw.to_string(),
            })
    }

    /// Rounds to two fraction digits, half away from zero.
    pub fn round_to_cents(self) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(CENT_DIGITS, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(CENT_DIGITS);
        Self(rounded)
    }

    /// Computes `self * quantity` rounded to cents.
    ///
    /// Fails when the product does not fit in a decimal.
    pub fn multiply_and_round(self, quantity: u32) -> Result<Self, InvalidMoney> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(|product| Self(product).round_to_cents())
            .ok_or_else(|| InvalidMoney {
                raw: format!("{} x {quantity}", self.0),
            })
    }

    /// Sums amounts exactly, then rounds the result to cents.
    ///
    /// Fails when the running sum does not fit in a decimal.
    pub fn sum_and_round(values: impl IntoIterator<Item = Money>) -> Result<Self, InvalidMoney> {
        values
            .into_iter()
            .try_fold(Decimal::ZERO, |sum, money| {
                sum.checked_add(money.0).ok_or_else(|| InvalidMoney {
                    raw: format!("{sum} + {}", money.0),
                })
            })
            .map(|sum| Self(sum).round_to_cents())
    }

    /// Returns the underlying decimal.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

fn is_decimal_literal(raw: &str) -> bool {
    let (mantissa, exponent) = match raw.find(['e', 'E']) {
        Some(at) => (&raw[..at], Some(&raw[at + 1..])),
        None => (raw, None),
    };
    let unsigned = |text: &str| text.strip_prefix(['+', '-']).unwrap_or(text).to_string();

    let mantissa = unsigned(mantissa);
    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    let digits = |text: &str| text.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && fraction.is_empty() {
        return false;
    }
    if !digits(whole) || !digits(fraction) {
        return false;
    }

    match exponent {
        Some(exponent) => {
            let exponent = unsigned(exponent);
            !exponent.is_empty() && digits(exponent.as_str())
        }
        None => true,
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
