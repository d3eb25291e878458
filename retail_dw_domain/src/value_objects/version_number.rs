//! # VersionNumber
//!
//! `v` + UTC timestamp `YYYYMMDD_HHMMSS` (spec §4.10). Collisions between
//! runs that start within the same second are resolved by appending a
//! short random suffix (spec §9, open question 3) before the unique
//! constraint is retried once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionNumber(String);

impl VersionNumber {
    pub fn for_timestamp(ts: DateTime<Utc>) -> Self {
        VersionNumber(format!("v{}", ts.format("%Y%m%d_%H%M%S")))
    }

    /// Produces a disambiguated version number after a uniqueness
    /// conflict, by appending a short suffix.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        VersionNumber(format!("{}_{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_as_v_prefixed_timestamp() {
        let ts = Utc.with_ymd_and_hms(2011, 10, 31, 14, 0, 0).unwrap();
        assert_eq!(VersionNumber::for_timestamp(ts).as_str(), "v20111031_140000");
    }

    #[test]
    fn suffix_disambiguates() {
        let ts = Utc.with_ymd_and_hms(2011, 10, 31, 14, 0, 0).unwrap();
        let base = VersionNumber::for_timestamp(ts);
        let suffixed = base.with_suffix("a1b2");
        assert_eq!(suffixed.as_str(), "v20111031_140000_a1b2");
    }
}
