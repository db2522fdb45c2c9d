//! Monetary and percentage value types.
//!
//! `Amount` wraps `Decimal` and parses values that may be written with a dollar sign and thousands
//! separators, e.g. `-$1,234.50`. It always displays as dollars with two decimal places.
//!
//! `Percent` wraps `Decimal` and displays with two decimal places and a `%` suffix.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

/// Represents a dollar amount, such as the `Sales` or `Profit` of an order.
///
/// # Examples
///
/// ```
/// # use sales_summary::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,050.5").unwrap();
/// assert_eq!(amount.to_string(), "-$1,050.50");
///
/// let amount = Amount::from_str("261.96").unwrap();
/// assert_eq!(amount.to_string(), "$261.96");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative. Zero is neither positive nor negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// `None` if the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, thiserror::Error)]
pub enum AmountError {
    #[error("'{input}' is not a valid amount: {source}")]
    Decimal {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error("'{0}' is not a valid amount: only one leading sign is allowed")]
    Sign(String),
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }

        // "-$50.00", "$50.00", "-50.00" and "50.00" are all accepted. The sign goes before the `$`.
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);
        if unsigned.starts_with(['-', '+']) {
            return Err(AmountError::Sign(s.to_string()));
        }
        let digits = unsigned.replace(',', "");

        let value = Decimal::from_str(&digits).map_err(|source| AmountError::Decimal {
            input: s.to_string(),
            source,
        })?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.abs().round_dp(2);
        write!(
            f,
            "{sign}${}",
            format_num::format_num!(",.2", abs.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialized as a plain decimal string so that no precision is lost.
        serializer.serialize_str(&self.0.to_string())
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

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Saturates at `Decimal::MAX` and `Decimal::MIN`. Use `checked_add` to detect overflow.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
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

/// A percentage, e.g. a profit margin. `Percent(12.5)` means 12.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// `part / whole * 100`, or zero when `whole` is zero. A ratio too large for a `Decimal`
    /// saturates at `Decimal::MAX` or `Decimal::MIN`.
    pub fn ratio(part: Amount, whole: Amount) -> Self {
        if whole.is_zero() {
            return Percent::ZERO;
        }
        let (part, whole) = (part.value(), whole.value());
        let value = part
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|p| p.checked_div(whole))
            .or_else(|| {
                part.checked_div(whole)
                    .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
            })
            .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            });
        Percent(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0.round_dp(2))
    }
}

impl Sub for Percent {
    type Output = Percent;

    fn sub(self, rhs: Self) -> Self::Output {
        Percent(self.0.saturating_sub(rhs.0))
    }
}

impl Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let value = Decimal::from_str(s.trim().trim_end_matches('%'))
            .map_err(serde::de::Error::custom)?;
        Ok(Percent(value))
    }
}
