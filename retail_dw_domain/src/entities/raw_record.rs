//! # RawRecord
//!
//! A single row from the source, before any cleaning. All fields are
//! text, mirroring how CSV rows arrive on the wire (spec §3, §6).

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub invoice_no: String,
    pub stock_code: String,
    pub description: String,
    pub quantity: String,
    pub invoice_date: String,
    pub unit_price: String,
    pub customer_id: String,
    pub country: String,
}
