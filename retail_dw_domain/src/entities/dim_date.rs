//! # DimDate
//!
//! Natural key = calendar date; surrogate key = `DateKey` (spec §3, §4.5).

use chrono::{Datelike, NaiveDate};

use crate::value_objects::DateKey;

#[derive(Debug, Clone)]
pub struct DimDate {
    pub date_key: DateKey,
    pub full_date: NaiveDate,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub week: u32,
    pub day_of_year: u32,
    pub day_of_month: u32,
    pub day_of_week: u32,
    pub month_name: String,
    pub day_name: String,
    pub quarter_name: String,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const DAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

impl DimDate {
    /// Materializes every `dim_date` attribute from a calendar date (spec
    /// §4.5: "materializing all date attributes from the date value").
    /// `is_holiday` is always false - no external holiday feed (§9,
    /// open question 6).
    pub fn from_date(date: NaiveDate) -> Self {
        let month = date.month();
        let quarter = (month - 1) / 3 + 1;
        DimDate {
            date_key: DateKey::from_date(date),
            full_date: date,
            year: date.year(),
            quarter,
            month,
            week: date.iso_week().week(),
            day_of_year: date.ordinal(),
            day_of_month: date.day(),
            day_of_week: date.weekday().number_from_monday(),
            month_name: MONTH_NAMES[(month - 1) as usize].to_string(),
            day_name: DAY_NAMES[(date.weekday().number_from_monday() - 1) as usize].to_string(),
            quarter_name: format!("Q{quarter}"),
            is_weekend: DateKey::is_weekend(date),
            is_holiday: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materializes_known_date() {
        let d = NaiveDate::from_ymd_opt(2010, 12, 1).unwrap();
        let dim = DimDate::from_date(d);
        assert_eq!(dim.date_key.value(), 20101201);
        assert_eq!(dim.year, 2010);
        assert_eq!(dim.quarter, 4);
        assert_eq!(dim.month, 12);
        assert_eq!(dim.month_name, "December");
        assert_eq!(dim.day_name, "Wednesday");
        assert!(!dim.is_weekend);
        assert!(!dim.is_holiday);
    }
}
