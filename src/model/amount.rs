//! Amount type for handling non-negative expense values.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may include a currency symbol and thousands separators.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Currency symbols that are accepted, and ignored, in front of a number.
const CURRENCY_SYMBOLS: [char; 2] = ['₹', '$'];

/// The largest amount a single expense can have. Totals of any realistic number of expenses stay
/// far below `Decimal::MAX`.
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Represents the amount of a single expense, or a total of several of them.
///
/// An `Amount` is never negative. It is written to the ledger file as a plain decimal number,
/// e.g. `50` or `12.5`, exactly as it was parsed.
///
/// # Examples
///
/// ```
/// # use spendbook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("₹1,250.50").unwrap();
/// assert_eq!(amount.to_string(), "1250.50");
/// assert_eq!(amount.display_with("₹"), "₹1,250.50");
/// ```
///
/// Negative values are rejected:
/// ```
/// # use spendbook::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new `Amount`, failing if `value` is negative or larger than one trillion.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        if value > MAX_AMOUNT {
            return Err(AmountError::TooLarge(value));
        }
        // Folds `-0` into `0`.
        Ok(Self(value.abs()))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Formats the amount for people: currency symbol, thousands separators and two decimal
    /// places, e.g. `₹60,000.00`.
    pub fn display_with(&self, symbol: &str) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let fixed = format!("{rounded:.2}");
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{symbol}{}.{fraction}", group_thousands(whole))
    }
}

/// Inserts a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (ix, c) in digits.chars().enumerate() {
        if ix > 0 && (digits.len() - ix) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountError {
    Empty,
    Invalid(String, rust_decimal::Error),
    Negative(Decimal),
    TooLarge(Decimal),
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "An amount is required"),
            AmountError::Invalid(s, e) => write!(f, "'{s}' is not a number: {e}"),
            AmountError::Negative(d) => write!(f, "An amount cannot be negative, got {d}"),
            AmountError::TooLarge(d) => {
                write!(f, "An amount cannot be more than {MAX_AMOUNT}, got {d}")
            }
        }
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let without_symbol = trimmed
            .strip_prefix(CURRENCY_SYMBOLS)
            .unwrap_or(trimmed)
            .trim_start();

        // Remove commas (thousand separators)
        let without_commas = without_symbol.replace(',', "");

        let value = Decimal::from_str(&without_commas)
            .map_err(|e| AmountError::Invalid(trimmed.to_string(), e))?;
        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        // Both sides are at most `MAX_AMOUNT`, so this needs tens of quadrillions of terms to
        // overflow.
        Amount(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
