//! # DimProduct
//!
//! Natural key = `stock_code`; surrogate key = autoincrement
//! `product_key`. SCD Type 1 (overwrite) - spec §3.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct DimProduct {
    pub product_key: Option<i64>,
    pub stock_code: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub is_active: bool,
    pub is_gift: bool,
    pub data_source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DimProduct {
    pub fn new(
        stock_code: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        is_gift: bool,
        data_source: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        DimProduct {
            product_key: None,
            stock_code: stock_code.into(),
            description: description.into(),
            category: category.into(),
            subcategory: subcategory.into(),
            is_active: true,
            is_gift,
            data_source: data_source.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Folds per-stock_code attributes across a batch (spec §4.5 step 4):
    /// longest non-empty description wins; category/subcategory take the
    /// first non-empty value seen; `is_gift` is OR-merged.
    pub fn merge_attributes(&mut self, other_description: &str, other_category: &str, other_subcategory: &str, other_is_gift: bool) {
        if other_description.len() > self.description.len() {
            self.description = other_description.to_string();
        }
        if self.category.is_empty() && !other_category.is_empty() {
            self.category = other_category.to_string();
        }
        if self.subcategory.is_empty() && !other_subcategory.is_empty() {
            self.subcategory = other_subcategory.to_string();
        }
        self.is_gift = self.is_gift || other_is_gift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_longer_description() {
        let now = Utc::now();
        let mut p = DimProduct::new("85123A", "SHORT", "Merchandise", "General", false, "CSV", now);
        p.merge_attributes("A MUCH LONGER DESCRIPTION", "", "", true);
        assert_eq!(p.description, "A MUCH LONGER DESCRIPTION");
        assert!(p.is_gift);
    }

    #[test]
    fn merge_keeps_first_nonempty_category() {
        let now = Utc::now();
        let mut p = DimProduct::new("85123A", "X", "", "", false, "CSV", now);
        p.merge_attributes("X", "Merchandise", "General", false);
        p.merge_attributes("X", "Fees", "Other", false);
        assert_eq!(p.category, "Merchandise");
    }
}
