//! # Transformer (C4)
//!
//! Lifts a `CleanedRecord` into a `TransformedRecord`: parses the invoice
//! number (credit-invoice flag), derives the transaction date, computes
//! the absolute line total, and runs the classifier (spec §4.2, §4.3).

use chrono::NaiveDate;

use crate::entities::{CleanedRecord, TransformedRecord};
use crate::services::classifier;
use crate::value_objects::InvoiceNumber;
use crate::EtlError;

pub struct Transformer;

impl Transformer {
    pub fn new() -> Self {
        Transformer
    }

    pub fn transform(&self, cleaned: CleanedRecord) -> Result<TransformedRecord, EtlError> {
        let invoice_no = InvoiceNumber::parse(&cleaned.invoice_no)?;

        let line_total = cleaned
            .unit_price
            .checked_mul_i64(cleaned.quantity.magnitude())
            .ok_or_else(|| EtlError::RecordMalformed(format!("line total overflow for invoice {}", cleaned.invoice_no)))?;

        let transaction_date: NaiveDate = cleaned.invoice_date.date();

        let line_total_signed = cleaned
            .unit_price
            .checked_mul_i64(cleaned.quantity.signed())
            .ok_or_else(|| EtlError::RecordMalformed(format!("line total overflow for invoice {}", cleaned.invoice_no)))?;

        let classification = classifier::classify(
            &cleaned.stock_code,
            &cleaned.description,
            cleaned.quantity,
            line_total_signed,
            invoice_no.is_credit_invoice(),
        );

        Ok(TransformedRecord {
            invoice_no,
            stock_code: cleaned.stock_code,
            description: cleaned.description,
            quantity: cleaned.quantity,
            unit_price: cleaned.unit_price,
            customer_id: cleaned.customer_id,
            country: cleaned.country,
            transaction_datetime: cleaned.invoice_date,
            transaction_date,
            line_total,
            category: classification.category,
            subcategory: classification.subcategory,
            is_gift: classification.is_gift,
            transaction_type: classification.transaction_type,
        })
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{Country, CustomerId, Money, Quantity, StockCode};
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn sample() -> CleanedRecord {
        CleanedRecord {
            invoice_no: "536365".to_string(),
            stock_code: StockCode::clean("85123A"),
            description: "White Hanging Heart T-light Holder".to_string(),
            quantity: Quantity::new(6),
            unit_price: Money::new(rust_decimal::Decimal::from_str("2.55").unwrap()),
            customer_id: CustomerId::clean("17850"),
            country: Country::clean("United Kingdom"),
            invoice_date: NaiveDateTime::parse_from_str("2010-12-01 08:26:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        }
    }

    #[test]
    fn computes_line_total_and_date() {
        let t = Transformer::new();
        let out = t.transform(sample()).unwrap();
        assert_eq!(out.line_total.to_string(), "15.30");
        assert_eq!(out.transaction_date.to_string(), "2010-12-01");
        assert!(!out.is_credit_invoice());
    }

    #[test]
    fn credit_invoice_flows_through() {
        let t = Transformer::new();
        let mut raw = sample();
        raw.invoice_no = "C536379".to_string();
        raw.quantity = Quantity::new(-1);
        let out = t.transform(raw).unwrap();
        assert!(out.is_credit_invoice());
        assert_eq!(out.transaction_type, crate::TransactionType::Return);
    }
}
