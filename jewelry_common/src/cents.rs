use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "USD";

//--------------------------------------        Cents         ---------------------------------------------------------
/// An amount of money in the minor unit of the shop currency (e.g. cents for USD).
///
/// Catalog prices, order totals and gateway sale prices are all held as `Cents`. The major-unit representation
/// (`40.00`) is only produced for display purposes, via the `Display` impl.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, AddAssign, add_assign);
op!(unary Cents, Neg, neg);

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in cents: {0}")]
pub struct CentsConversionError(String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Parses decimal amounts in major units, e.g. "40", "40.5" or "40.05". At most two decimal places are accepted.
impl FromStr for Cents {
    type Err = CentsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut parts = digits.splitn(2, '.');
        let whole = parts
            .next()
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| CentsConversionError(format!("Invalid amount: {s}")))?
            .parse::<i64>()
            .map_err(|e| CentsConversionError(format!("Invalid amount: {s}. {e}")))?;
        let fraction = match parts.next() {
            None => 0,
            Some(f) if f.len() == 1 && f.chars().all(|c| c.is_ascii_digit()) => f.parse::<i64>().unwrap_or(0) * 10,
            Some(f) if f.len() == 2 && f.chars().all(|c| c.is_ascii_digit()) => f.parse::<i64>().unwrap_or(0),
            Some(_) => return Err(CentsConversionError(format!("Invalid fractional part in {s}"))),
        };
        let value = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction))
            .ok_or_else(|| CentsConversionError(format!("Amount is too large: {s}")))?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    /// The price of `quantity` units at this unit price, or `None` on overflow.
    pub fn checked_mul(&self, quantity: i64) -> Option<Self> {
        self.0.checked_mul(quantity).map(Self)
    }

    pub fn checked_add(&self, other: Cents) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_major_units() {
        assert_eq!(Cents::from(4000).to_string(), "40.00");
        assert_eq!(Cents::from(5).to_string(), "0.05");
        assert_eq!(Cents::from(-1250).to_string(), "-12.50");
        assert_eq!(Cents::default().to_string(), "0.00");
    }

    #[test]
    fn parse_major_units() {
        assert_eq!("40".parse::<Cents>().unwrap(), Cents::from(4000));
        assert_eq!("10.5".parse::<Cents>().unwrap(), Cents::from(1050));
        assert_eq!(" 0.05 ".parse::<Cents>().unwrap(), Cents::from(5));
        assert_eq!("-3.20".parse::<Cents>().unwrap(), Cents::from(-320));
        assert!("1.234".parse::<Cents>().is_err());
        assert!("abc".parse::<Cents>().is_err());
        assert!(".50".parse::<Cents>().is_err());
    }

    #[test]
    fn sum_line_items() {
        let total: Cents = [Cents::from(1000).checked_mul(3), Cents::from(500).checked_mul(2)]
            .into_iter()
            .map(Option::unwrap)
            .sum();
        assert_eq!(total, Cents::from_major(40));
        assert_eq!(Cents::from(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Cents::from(4000)).unwrap(), "4000");
    }
}
