//! # CleanedRecord
//!
//! Output of the `Cleaner` stage (spec §3, §4.1): every field has passed
//! its cleaning transform and all ERROR-severity validation predicates.

use chrono::NaiveDateTime;

use crate::value_objects::{Country, CustomerId, Money, Quantity, StockCode};

#[derive(Debug, Clone)]
pub struct CleanedRecord {
    /// Uppercased, trimmed raw invoice text (e.g. "C536379"); parsed into
    /// an `InvoiceNumber` by the transform stage.
    pub invoice_no: String,
    pub stock_code: StockCode,
    pub description: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub customer_id: CustomerId,
    pub country: Country,
    pub invoice_date: NaiveDateTime,
}
