//! # DateKey
//!
//! Surrogate key for `dim_date`: `date_key = year*10000 + month*100 + day`
//! (spec §3, §4.5). This is a bijection with ISO dates in
//! `[0001-01-01, 9999-12-31]` (spec §8).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateKey(i32);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date.year() * 10_000 + (date.month() as i32) * 100 + date.day() as i32)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// Inverse of `from_date`; total over the valid surrogate-key space.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let year = self.0 / 10_000;
        let month = (self.0 / 100) % 100;
        let day = self.0 % 100;
        NaiveDate::from_ymd_opt(year, month as u32, day as u32)
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        // ISO weekday: Monday=1 .. Sunday=7; weekend is Saturday(6)/Sunday(7).
        date.weekday().number_from_monday() >= 6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_matches_spec_formula() {
        let d = NaiveDate::from_ymd_opt(2010, 12, 1).unwrap();
        assert_eq!(DateKey::from_date(d).value(), 20101201);
    }

    #[test]
    fn round_trips() {
        let d = NaiveDate::from_ymd_opt(2011, 11, 10).unwrap();
        let key = DateKey::from_date(d);
        assert_eq!(key.to_date(), Some(d));
    }

    #[test]
    fn weekend_detection() {
        // 2010-12-01 is a Wednesday.
        let wed = NaiveDate::from_ymd_opt(2010, 12, 1).unwrap();
        assert!(!DateKey::is_weekend(wed));
        // 2010-12-04 is a Saturday.
        let sat = NaiveDate::from_ymd_opt(2010, 12, 4).unwrap();
        assert!(DateKey::is_weekend(sat));
    }

    #[test]
    fn bijective_over_sampled_range() {
        let mut d = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let mut count = 0;
        while d < end && count < 5000 {
            let key = DateKey::from_date(d);
            assert_eq!(key.to_date(), Some(d));
            d = d.succ_opt().unwrap();
            count += 1;
        }
    }
}
