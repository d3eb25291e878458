//! # TransformedRecord
//!
//! Cleaned record plus the derived fields computed by the Transformer
//! and Classifier stages (spec §3, §4.2, §4.3): this is what the
//! `DimensionResolver` and `FactWriter` consume.

use chrono::{NaiveDate, NaiveDateTime};

use crate::value_objects::{Country, CustomerId, InvoiceNumber, Money, Quantity, StockCode};
use crate::TransactionType;

#[derive(Debug, Clone)]
pub struct TransformedRecord {
    pub invoice_no: InvoiceNumber,
    pub stock_code: StockCode,
    pub description: String,
    /// Signed as cleaned; `quantity.magnitude()` is what gets persisted.
    pub quantity: Quantity,
    /// Absolute-value unit price; always non-negative after cleaning.
    pub unit_price: Money,
    pub customer_id: CustomerId,
    pub country: Country,
    pub transaction_datetime: NaiveDateTime,
    pub transaction_date: NaiveDate,

    /// Absolute value of quantity * unit_price (spec §4.2).
    pub line_total: Money,

    pub category: String,
    pub subcategory: String,
    pub is_gift: bool,
    pub transaction_type: TransactionType,
}

impl TransformedRecord {
    pub fn is_credit_invoice(&self) -> bool {
        self.invoice_no.is_credit_invoice()
    }
}
