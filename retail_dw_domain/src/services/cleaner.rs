//! # Cleaner (C3)
//!
//! Per-record rule application: cleaning transforms run first and may
//! replace a column value, then validation predicates run and may reject
//! the record (spec §4.1). Rules are declarative
//! `{name, description, columns, severity, enabled}` records; cleaning
//! transforms themselves are fixed per spec (the eight steps below), while
//! validation is a small table of `ValidationRule`s so new checks can be
//! added without touching the two-phase control flow.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::entities::{CleanedRecord, RawRecord};
use crate::value_objects::{Country, CustomerId, Money, Quantity, StockCode};
use crate::{EtlError, MissingValuePolicy, Severity};

/// A declarative validation predicate: `severity = Error` rejects the
/// record, `severity = Warning` only logs (the caller collects
/// `CleaningOutcome::warnings` and is responsible for emitting them).
pub struct ValidationRule {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [&'static str],
    pub severity: Severity,
    pub enabled: bool,
    predicate: fn(&CleanedRecord, NaiveDate) -> bool,
}

fn invoice_format_ok(r: &CleanedRecord, _today: NaiveDate) -> bool {
    crate::InvoiceNumber::matches_format(&r.invoice_no)
}

fn quantity_nonzero(r: &CleanedRecord, _today: NaiveDate) -> bool {
    !r.quantity.is_zero()
}

fn unit_price_non_negative(r: &CleanedRecord, _today: NaiveDate) -> bool {
    r.unit_price.is_non_negative()
}

fn date_in_range(r: &CleanedRecord, today: NaiveDate) -> bool {
    let floor = NaiveDate::from_ymd_opt(2009, 1, 1).expect("valid constant date");
    let d = r.invoice_date.date();
    d >= floor && d <= today
}

fn default_validation_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule {
            name: "invoice_format",
            description: "invoice number matches ^C?\\d{5,7}[A-Z]?$",
            columns: &["InvoiceNo"],
            severity: Severity::Error,
            enabled: true,
            predicate: invoice_format_ok,
        },
        ValidationRule {
            name: "quantity_nonzero",
            description: "quantity is non-zero",
            columns: &["Quantity"],
            severity: Severity::Error,
            enabled: true,
            predicate: quantity_nonzero,
        },
        ValidationRule {
            name: "unit_price_non_negative",
            description: "unit price is >= 0",
            columns: &["UnitPrice"],
            severity: Severity::Error,
            enabled: true,
            predicate: unit_price_non_negative,
        },
        ValidationRule {
            name: "date_in_range",
            description: "invoice date within [2009-01-01, today]",
            columns: &["InvoiceDate"],
            severity: Severity::Error,
            enabled: true,
            predicate: date_in_range,
        },
    ]
}

#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Composite natural key used for duplicate detection (spec §4.1:
    /// "default {InvoiceNo, StockCode}").
    pub duplicate_key_columns: Vec<String>,
    pub customer_id_missing_policy: MissingValuePolicy,
    pub today: NaiveDate,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        CleanerConfig {
            duplicate_key_columns: vec!["InvoiceNo".to_string(), "StockCode".to_string()],
            customer_id_missing_policy: MissingValuePolicy::FillUnknown,
            today: chrono::Utc::now().date_naive(),
        }
    }
}

pub struct CleaningOutcome {
    pub record: CleanedRecord,
    pub warnings: Vec<String>,
}

/// Stateful per-run cleaner: owns the duplicate-detection set and the
/// validation rule table. One instance per pipeline run (the pipeline
/// owns it for the run's lifetime, per spec §9 "cycles and ownership").
pub struct Cleaner {
    config: CleanerConfig,
    rules: Vec<ValidationRule>,
    seen_keys: HashSet<String>,
}

impl Cleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Cleaner {
            config,
            rules: default_validation_rules(),
            seen_keys: HashSet::new(),
        }
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Applies cleaning transforms, then validation predicates, then
    /// duplicate detection, to a single raw record.
    pub fn clean(&mut self, raw: &RawRecord) -> Result<CleaningOutcome, EtlError> {
        let mut warnings = Vec::new();

        let invoice_no = clean_invoice_no(&raw.invoice_no);
        let stock_code = StockCode::clean(&raw.stock_code);
        let description = clean_description(&raw.description);
        let quantity = clean_quantity(&raw.quantity);
        let unit_price = clean_unit_price(&raw.unit_price);
        let customer_id = clean_customer_id(&raw.customer_id, self.config.customer_id_missing_policy);
        let country = Country::clean(&raw.country);
        let invoice_date = parse_invoice_date(&raw.invoice_date)
            .ok_or_else(|| EtlError::RecordMalformed(format!("unparseable InvoiceDate: {}", raw.invoice_date)))?;

        let record = CleanedRecord {
            invoice_no,
            stock_code,
            description,
            quantity,
            unit_price,
            customer_id,
            country,
            invoice_date,
        };

        for rule in self.rules.iter().filter(|r| r.enabled) {
            let ok = (rule.predicate)(&record, self.config.today);
            if !ok {
                match rule.severity {
                    Severity::Error => {
                        return Err(EtlError::ValidationFailed(format!(
                            "{}: {}",
                            rule.name, rule.description
                        )));
                    }
                    Severity::Warning => {
                        warnings.push(format!("{}: {}", rule.name, rule.description));
                    }
                }
            }
        }

        let dup_key = self.duplicate_key(&record);
        if !self.seen_keys.insert(dup_key) {
            return Err(EtlError::record_rejected(format!(
                "duplicate natural key ({:?}): {}/{}",
                self.config.duplicate_key_columns, record.invoice_no, record.stock_code
            )));
        }

        Ok(CleaningOutcome { record, warnings })
    }

    fn duplicate_key(&self, record: &CleanedRecord) -> String {
        // Only InvoiceNo/StockCode are meaningful natural-key columns for
        // this record shape; other configured columns are ignored if
        // named (defensive - the default config never sets them).
        format!("{}|{}", record.invoice_no, record.stock_code.as_str())
    }
}

fn clean_invoice_no(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn clean_description(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let title_cased = title_case(&collapsed);
    title_cased.trim_end_matches(|c: char| c.is_ascii_punctuation()).to_string()
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips non-digit/sign characters, then parses via an f64 intermediate
/// (spec §4.1 rule 4: "parse as integer via float intermediate"); empty
/// input becomes zero (rejected downstream by `quantity_nonzero`).
fn clean_quantity(raw: &str) -> Quantity {
    let stripped: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '-' || *c == '+').collect();
    if stripped.is_empty() || stripped == "-" || stripped == "+" {
        return Quantity::new(0);
    }
    let signed = stripped.parse::<f64>().map(|f| f as i64).unwrap_or(0);
    Quantity::new(signed)
}

/// Strips currency symbols and whitespace, parses as decimal, quantizes
/// to 2 places; non-parseable input becomes zero (spec §4.1 rule 5).
fn clean_unit_price(raw: &str) -> Money {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '£' | '$' | '€') && !c.is_whitespace()).collect();
    match stripped.parse::<rust_decimal::Decimal>() {
        Ok(d) => Money::new(d),
        Err(_) => Money::zero(),
    }
}

fn clean_customer_id(raw: &str, policy: MissingValuePolicy) -> CustomerId {
    let cleaned = CustomerId::clean(raw);
    if raw.trim().is_empty() {
        match policy {
            MissingValuePolicy::Drop => cleaned, // caller may reject upstream of this point if desired
            _ => CustomerId::guest(),
        }
    } else {
        cleaned
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
];

fn parse_invoice_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    // Permissive fallback: try RFC3339-ish / generic parse.
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raw() -> RawRecord {
        RawRecord {
            invoice_no: "536365".to_string(),
            stock_code: " 85123a ".to_string(),
            description: "white hanging heart t-light holder  ".to_string(),
            quantity: "2".to_string(),
            invoice_date: "2010-12-01 08:26:00".to_string(),
            unit_price: "£3.50".to_string(),
            customer_id: "17850".to_string(),
            country: "United Kingdom".to_string(),
        }
    }

    fn cleaner() -> Cleaner {
        Cleaner::new(CleanerConfig {
            today: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ..CleanerConfig::default()
        })
    }

    #[test]
    fn cleans_simple_sale_row() {
        let mut c = cleaner();
        let outcome = c.clean(&sample_raw()).unwrap();
        assert_eq!(outcome.record.invoice_no, "536365");
        assert_eq!(outcome.record.stock_code.as_str(), "85123A");
        assert_eq!(outcome.record.description, "White Hanging Heart T-light Holder");
        assert_eq!(outcome.record.quantity.signed(), 2);
        assert_eq!(outcome.record.unit_price.to_string(), "3.50");
    }

    #[test]
    fn rejects_duplicate_natural_key() {
        let mut c = cleaner();
        let raw = sample_raw();
        c.clean(&raw).unwrap();
        let second = c.clean(&raw);
        assert!(second.is_err());
    }

    #[test]
    fn rejects_zero_quantity() {
        let mut c = cleaner();
        let mut raw = sample_raw();
        raw.quantity = "0".to_string();
        assert!(c.clean(&raw).is_err());
    }

    #[test]
    fn empty_customer_id_becomes_guest() {
        let mut c = cleaner();
        let mut raw = sample_raw();
        raw.customer_id = "".to_string();
        let outcome = c.clean(&raw).unwrap();
        assert!(outcome.record.customer_id.is_guest());
    }

    #[test]
    fn unparseable_date_is_malformed() {
        let mut c = cleaner();
        let mut raw = sample_raw();
        raw.invoice_date = "not-a-date".to_string();
        let err = c.clean(&raw).unwrap_err();
        assert!(matches!(err, EtlError::RecordMalformed(_)));
    }

    #[test]
    fn unit_price_strips_currency_symbols() {
        let mut c = cleaner();
        let mut raw = sample_raw();
        raw.unit_price = "$ 1.955".to_string();
        let outcome = c.clean(&raw).unwrap();
        assert_eq!(outcome.record.unit_price.to_string(), "1.96");
    }
}
