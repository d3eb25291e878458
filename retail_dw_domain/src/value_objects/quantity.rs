//! # Quantity
//!
//! Signed integer quantity as cleaned from the source, plus the absolute
//! magnitude persisted to `fact_sales.quantity` (spec §3: "fact.quantity ≥
//! 0 ... signs absorbed into transaction_type").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(signed: i64) -> Self {
        Quantity(signed)
    }

    pub fn signed(&self) -> i64 {
        self.0
    }

    /// Magnitude persisted to the fact table; always non-negative.
    pub fn magnitude(&self) -> i64 {
        self.0.unsigned_abs() as i64
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_is_absolute_value() {
        assert_eq!(Quantity::new(-3).magnitude(), 3);
        assert_eq!(Quantity::new(3).magnitude(), 3);
        assert_eq!(Quantity::new(0).magnitude(), 0);
    }

    #[test]
    fn sign_predicates() {
        assert!(Quantity::new(-1).is_negative());
        assert!(Quantity::new(1).is_positive());
        assert!(Quantity::new(0).is_zero());
    }
}
