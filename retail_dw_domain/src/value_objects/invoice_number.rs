//! # InvoiceNumber
//!
//! Parses the cleaned `InvoiceNo` text into its numeric invoice and the
//! credit-invoice flag (spec §4.2: "strip optional leading `C`, record
//! is_credit_invoice").

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::EtlError;

/// `^C?\d{5,7}[A-Z]?$` - spec §4.1 validation predicate for InvoiceNo.
static INVOICE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^C?\d{5,7}[A-Z]?$").expect("static regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber {
    /// The cleaned, uppercased, trimmed raw text (e.g. "C536379").
    raw: String,
    /// Numeric invoice with the optional `C` prefix and any trailing
    /// alpha suffix stripped.
    numeric: i64,
    is_credit_invoice: bool,
}

impl InvoiceNumber {
    pub fn matches_format(raw: &str) -> bool {
        INVOICE_FORMAT.is_match(raw)
    }

    /// Parses an already-cleaned invoice number (uppercase, trimmed).
    pub fn parse(raw: &str) -> Result<Self, EtlError> {
        let is_credit_invoice = raw.starts_with('C');
        let digits: String = raw
            .chars()
            .skip(if is_credit_invoice { 1 } else { 0 })
            .take_while(|c| c.is_ascii_digit())
            .collect();

        let numeric: i64 = digits
            .parse()
            .map_err(|_| EtlError::RecordMalformed(format!("invoice number not numeric: {raw}")))?;

        Ok(InvoiceNumber {
            raw: raw.to_string(),
            numeric,
            is_credit_invoice,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn numeric(&self) -> i64 {
        self.numeric
    }

    pub fn is_credit_invoice(&self) -> bool {
        self.is_credit_invoice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_credit_prefix() {
        let inv = InvoiceNumber::parse("C536379").unwrap();
        assert_eq!(inv.numeric(), 536379);
        assert!(inv.is_credit_invoice());
    }

    #[test]
    fn plain_sale_invoice() {
        let inv = InvoiceNumber::parse("536365").unwrap();
        assert_eq!(inv.numeric(), 536365);
        assert!(!inv.is_credit_invoice());
    }

    #[test]
    fn trailing_alpha_suffix_ignored_by_numeric_parse() {
        let inv = InvoiceNumber::parse("536365A").unwrap();
        assert_eq!(inv.numeric(), 536365);
    }

    #[test]
    fn format_predicate() {
        assert!(InvoiceNumber::matches_format("536365"));
        assert!(InvoiceNumber::matches_format("C536379"));
        assert!(InvoiceNumber::matches_format("5363651A"));
        assert!(!InvoiceNumber::matches_format("ABC"));
        assert!(!InvoiceNumber::matches_format("123"));
    }
}
