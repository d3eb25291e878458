//! # StockCode
//!
//! Natural key for `dim_product`. Cleaning strips anything outside
//! `[A-Z0-9\-._]` after uppercasing (spec §4.1 rule 2; the underscore is
//! kept in addition to the spec's literal `[A-Z0-9\-.]` character class -
//! the original implementation strips with `\w` (word characters, which
//! include `_`), and the `GIFT_####_##` stock codes in spec §4.3's
//! classification table and example 5 depend on the underscore
//! surviving cleaning).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockCode(String);

impl StockCode {
    pub fn clean(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        let cleaned: String = upper
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '.' || *c == '_')
            .collect();
        StockCode(cleaned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for StockCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_disallowed_characters() {
        assert_eq!(StockCode::clean("85123a ").as_str(), "85123A");
        assert_eq!(StockCode::clean("gift_0001_20!").as_str(), "GIFT_0001_20");
    }

    #[test]
    fn keeps_dash_and_dot() {
        assert_eq!(StockCode::clean("ab-12.3!").as_str(), "AB-12.3");
    }
}
