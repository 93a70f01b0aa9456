//! Monetary decimal type rounded to cents on demand.
//!
//! Uses `rust_decimal` internally so price arithmetic never goes through
//! binary floating point.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A price or currency amount.
///
/// Values keep whatever precision they were created with; `round_to_cents`
/// produces the two-decimal form stored as a new price. Display and
/// serialization always render exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use pricing_engine::Price;
///
/// let price = Price::from_str("10.5").unwrap();
/// assert_eq!(price.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places a rounded price carries.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Price(Decimal::ZERO);

    /// One hundred, the upper bound of a percentage adjustment.
    pub const HUNDRED: Self = Price(Decimal::ONE_HUNDRED);

    pub fn new(value: Decimal) -> Self {
        Price(value)
    }

    /// Returns the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to 2 decimal places, ties away from zero (`0.005 -> 0.01`).
    pub fn round_to_cents(&self) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Price(rounded)
    }

    /// Floors the value at zero.
    pub fn clamp_non_negative(&self) -> Self {
        if self.is_negative() {
            Self::ZERO
        } else {
            *self
        }
    }

    /// Returns `percent`% of this value, unrounded. `None` on overflow.
    pub fn checked_percent_of(&self, percent: Price) -> Option<Self> {
        (percent.0 / Decimal::ONE_HUNDRED).checked_mul(self.0).map(Price)
    }

    /// `None` if the sum overflows.
    pub fn checked_add(self, rhs: Price) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Price)
    }

    /// `None` if the difference overflows.
    pub fn checked_sub(self, rhs: Price) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Price)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Price(decimal))
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Price(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.round_to_cents().0)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Price::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    #[test]
    fn test_display_always_two_places() {
        assert_eq!(p("1").to_string(), "1.00");
        assert_eq!(p("1.5").to_string(), "1.50");
        assert_eq!(p("  2.25  ").to_string(), "2.25");
        assert_eq!(p("-20").to_string(), "-20.00");
    }

    #[test]
    fn test_round_to_cents_half_away_from_zero() {
        assert_eq!(p("120.579").round_to_cents(), p("120.58"));
        assert_eq!(p("120.333").round_to_cents(), p("120.33"));
        assert_eq!(p("0.005").round_to_cents(), p("0.01"));
        assert_eq!(p("-0.005").round_to_cents(), p("-0.01"));
        assert_eq!(p("2.345").round_to_cents(), p("2.35"));
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(p("-3").clamp_non_negative(), Price::ZERO);
        assert_eq!(p("3").clamp_non_negative(), p("3"));
        assert_eq!(Price::ZERO.clamp_non_negative(), Price::ZERO);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(p("200").checked_percent_of(p("12.5")), Some(p("25")));
        assert_eq!(p("100").checked_percent_of(p("100")), Some(p("100")));
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(p("1.5").checked_add(p("2")), Some(p("3.5")));
        assert_eq!(p("1.5").checked_sub(p("2")), Some(p("-0.5")));
        assert!(max.checked_add(p("1")).is_none());
        assert!(Price::new(Decimal::MIN).checked_sub(p("1")).is_none());
        assert!(max.checked_percent_of(p("150")).is_none());
        assert!(max.checked_percent_of(p("50")).is_some());
    }

    #[test]
    fn test_negative_zero_is_not_negative() {
        assert!(!p("-0").is_negative());
        assert!(!p("0.00").is_negative());
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(Price::from_str("abc").is_err());
        assert!(Price::from_str("NaN").is_err());
        assert!(Price::from_str("inf").is_err());
        assert!(Price::from_str("").is_err());
    }
}
