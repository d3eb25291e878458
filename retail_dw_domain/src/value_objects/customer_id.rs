//! # CustomerId
//!
//! Natural key for `dim_customer`. Cleaning trims whitespace, drops a
//! trailing `.0` (CSV sources frequently serialize customer IDs through a
//! float column), and maps an empty value to the sentinel `"GUEST"`
//! (spec §3 cleaned-record definition).

use serde::{Deserialize, Serialize};

pub const GUEST: &str = "GUEST";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn clean(raw: &str) -> Self {
        let trimmed = raw.trim();
        let without_float_suffix = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        if without_float_suffix.is_empty() {
            CustomerId(GUEST.to_string())
        } else {
            CustomerId(without_float_suffix.to_string())
        }
    }

    pub fn guest() -> Self {
        CustomerId(GUEST.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_becomes_guest() {
        assert_eq!(CustomerId::clean("").as_str(), "GUEST");
        assert_eq!(CustomerId::clean("   ").as_str(), "GUEST");
    }

    #[test]
    fn drops_trailing_float_suffix() {
        assert_eq!(CustomerId::clean("17850.0").as_str(), "17850");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(CustomerId::clean("  14527  ").as_str(), "14527");
    }
}
