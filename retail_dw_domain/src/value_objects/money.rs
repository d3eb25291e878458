//! # Money
//!
//! Fixed-scale decimal value object for `unit_price` / `line_total`. Backed
//! by `rust_decimal::Decimal` so arithmetic never touches floating point;
//! quantization to 2 fractional digits uses banker's rounding
//! (`RoundingStrategy::MidpointNearestEven`), matching spec §9's decimal
//! arithmetic design note.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Quantizes to 2 fractional digits with banker's rounding.
    pub fn new(value: Decimal) -> Self {
        Money(value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_non_negative(&self) -> bool {
        !self.is_negative()
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn checked_mul_i64(&self, rhs: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(rhs)).map(Money::new)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn quantizes_to_two_places() {
        let m = Money::new(d("3.456"));
        assert_eq!(m.as_decimal(), d("3.46"));
    }

    #[test]
    fn negative_detection() {
        assert!(Money::new(d("-1.00")).is_negative());
        assert!(Money::zero().is_non_negative());
        assert!(Money::new(d("1.00")).is_non_negative());
    }

    #[test]
    fn line_total_is_absolute_value() {
        let unit_price = Money::new(d("3.50"));
        let total = unit_price.checked_mul_i64(2).unwrap();
        assert_eq!(total.as_decimal(), d("7.00"));
    }
}
