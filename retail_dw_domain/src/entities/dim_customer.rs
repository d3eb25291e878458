//! # DimCustomer
//!
//! Natural key = `customer_id`; surrogate key = autoincrement
//! `customer_key`. SCD Type 2 columns are carried (`effective_date`,
//! `expiry_date`, `is_current`) but the loader only maintains a single
//! `is_current = true` row per `customer_id`, overwriting `country` on
//! change (spec §3, §9 open question 5).

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct DimCustomer {
    pub customer_key: Option<i64>,
    pub customer_id: String,
    pub country: String,
    pub effective_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_current: bool,
}

impl DimCustomer {
    pub fn new(customer_id: impl Into<String>, country: impl Into<String>, now: DateTime<Utc>) -> Self {
        DimCustomer {
            customer_key: None,
            customer_id: customer_id.into(),
            country: country.into(),
            effective_date: now,
            expiry_date: None,
            is_current: true,
        }
    }
}
