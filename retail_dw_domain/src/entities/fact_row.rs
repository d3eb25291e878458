//! # FactRow
//!
//! A fact-ready record annotated with resolved surrogate keys, ready for
//! `FactWriter::insert_batch` (spec §3, §4.7).

use chrono::NaiveDateTime;

use crate::value_objects::{BatchId, DateKey, Money, VersionId};
use crate::TransactionType;

#[derive(Debug, Clone)]
pub struct FactRow {
    pub sales_key: Option<i64>,
    pub customer_key: i64,
    pub product_key: i64,
    pub date_key: DateKey,
    pub invoice_no: i64,
    pub transaction_type: TransactionType,
    /// Non-negative magnitude (spec invariant: `fact.quantity >= 0`).
    pub quantity: i64,
    /// Non-negative magnitude (spec invariant: `fact.unit_price >= 0`).
    pub unit_price: Money,
    pub line_total: Money,
    pub transaction_datetime: NaiveDateTime,
    pub batch_id: BatchId,
    pub version_id: Option<VersionId>,
    pub data_source: String,
}
