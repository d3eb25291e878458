//! # Classifier (C5)
//!
//! A pure function from `(stock_code, description, quantity, unit_price,
//! is_credit_invoice)` to `(category, subcategory, is_gift,
//! transaction_type)` (spec §4.3). The categorization table is exact-match
//! on the uppercased stock code, first match wins; everything that falls
//! through is keyword-matched on the description, then defaults to
//! Merchandise/General.

use crate::value_objects::{Money, Quantity, StockCode};
use crate::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Fees,
    Shipping,
    Adjustment,
    Discount,
    Services,
    Charity,
    Stationery,
    GiftSets,
    GiftVoucher,
    Merchandise,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub subcategory: String,
    pub is_gift: bool,
    pub transaction_type: TransactionType,
}

/// Categorization table (spec §4.3): first match wins, exact on the
/// uppercased stock code.
fn categorize(code: &str, description_upper: &str) -> (Category, String, bool) {
    match code {
        "AMAZONFEE" => return (Category::Fees, "Marketplace Fee".to_string(), false),
        "BANKCHARGES" => return (Category::Fees, "Bank Charge".to_string(), false),
        "POST" => return (Category::Shipping, "Postage".to_string(), false),
        "C2" => return (Category::Shipping, "Carrier Surcharge".to_string(), false),
        "DOT" => return (Category::Adjustment, "Rounding".to_string(), false),
        "M" => return (Category::Adjustment, "Manual".to_string(), false),
        "D" => return (Category::Discount, "Manual Discount".to_string(), false),
        "S" => return (Category::Services, "Service Charge".to_string(), false),
        "CRUK" => return (Category::Charity, "Donation".to_string(), false),
        "PADS" => return (Category::Stationery, "Pads".to_string(), false),
        "DCGSSBOY" => return (Category::GiftSets, "Boy".to_string(), true),
        "DCGSSGIRL" => return (Category::GiftSets, "Girl".to_string(), true),
        _ => {}
    }
    if code.starts_with("DCGS") {
        return (Category::GiftSets, "DCGS".to_string(), true);
    }
    if let Some(rest) = code.strip_prefix("GIFT_") {
        let subcategory = voucher_amount(rest).map(|amount| format!("Voucher £{amount}")).unwrap_or_else(|| "Voucher".to_string());
        return (Category::GiftVoucher, subcategory, true);
    }
    if description_upper.contains("POSTAGE") || description_upper.contains("SHIPPING") {
        return (Category::Shipping, "Postage".to_string(), false);
    }
    if description_upper.contains("DISCOUNT") {
        return (Category::Discount, "Promotion".to_string(), false);
    }
    (Category::Merchandise, "General".to_string(), false)
}

/// Extracts the voucher face-value amount from a `GIFT_0001_20`-style
/// stock code (the trailing numeric segment, read as whole currency
/// units - spec example 5: `GIFT_0001_20` → "Voucher £20").
fn voucher_amount(rest: &str) -> Option<String> {
    rest.rsplit('_').next().filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())).map(|s| s.to_string())
}

/// Transaction-type classifier (spec §4.3), given the resolved category
/// plus the credit-invoice flag and quantity/line-total signs.
fn transaction_type(category: Category, is_credit_invoice: bool, quantity: Quantity, line_total_signed: Money) -> TransactionType {
    match category {
        Category::Fees => {
            if is_credit_invoice {
                TransactionType::FeeReversal
            } else {
                TransactionType::Fee
            }
        }
        Category::Shipping => {
            if is_credit_invoice {
                TransactionType::ShippingRefund
            } else {
                TransactionType::ShippingCharge
            }
        }
        Category::Discount => {
            if is_credit_invoice {
                TransactionType::DiscountReversal
            } else {
                TransactionType::Discount
            }
        }
        Category::Charity => TransactionType::Donation,
        Category::Adjustment => {
            if quantity.is_negative() {
                TransactionType::AdjustmentOut
            } else if quantity.is_positive() {
                TransactionType::AdjustmentIn
            } else {
                TransactionType::Adjustment
            }
        }
        Category::GiftVoucher => {
            if is_credit_invoice || quantity.is_negative() || line_total_signed.is_negative() {
                TransactionType::VoucherRedemption
            } else {
                TransactionType::VoucherSale
            }
        }
        Category::Services => TransactionType::Service,
        Category::Stationery | Category::GiftSets | Category::Merchandise => {
            if is_credit_invoice && quantity.signed() <= 0 {
                TransactionType::Return
            } else if !is_credit_invoice && quantity.is_negative() {
                TransactionType::AdjustmentOut
            } else {
                TransactionType::Sale
            }
        }
    }
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Fees => "Fees",
        Category::Shipping => "Shipping",
        Category::Adjustment => "Adjustment",
        Category::Discount => "Discount",
        Category::Services => "Services",
        Category::Charity => "Charity",
        Category::Stationery => "Stationery",
        Category::GiftSets => "Gift Sets",
        Category::GiftVoucher => "Gift Voucher",
        Category::Merchandise => "Merchandise",
    }
}

/// Classifies a single transformed line. `quantity` is the cleaned
/// signed quantity; `line_total_signed` carries the sign that the
/// persisted (absolute) `line_total` has already lost, needed only for
/// the gift-voucher redemption/sale distinction.
pub fn classify(
    stock_code: &StockCode,
    description: &str,
    quantity: Quantity,
    line_total_signed: Money,
    is_credit_invoice: bool,
) -> Classification {
    let code = stock_code.as_str();
    let description_upper = description.to_uppercase();

    let (category, subcategory, is_gift) = categorize(code, &description_upper);
    let transaction_type = transaction_type(category, is_credit_invoice, quantity, line_total_signed);

    Classification {
        category: category_label(category).to_string(),
        subcategory,
        is_gift,
        transaction_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::new(rust_decimal::Decimal::from_str(s).unwrap())
    }

    #[test]
    fn simple_sale() {
        let c = classify(&StockCode::clean("85123A"), "White Hanging Heart T-light Holder", Quantity::new(2), money("7.00"), false);
        assert_eq!(c.category, "Merchandise");
        assert_eq!(c.transaction_type, TransactionType::Sale);
        assert!(!c.is_gift);
    }

    #[test]
    fn credit_invoice_is_return() {
        let c = classify(&StockCode::clean("22629"), "Spaceboy Lunch Box", Quantity::new(-1), money("-1.95"), true);
        assert_eq!(c.transaction_type, TransactionType::Return);
    }

    #[test]
    fn amazon_fee() {
        let c = classify(&StockCode::clean("AMAZONFEE"), "Amazon Fee", Quantity::new(1), money("11.62"), false);
        assert_eq!(c.category, "Fees");
        assert_eq!(c.subcategory, "Marketplace Fee");
        assert_eq!(c.transaction_type, TransactionType::Fee);
    }

    #[test]
    fn discount_reversal_on_credit_invoice() {
        let c = classify(&StockCode::clean("D"), "Discount", Quantity::new(-1), money("-27.50"), true);
        assert_eq!(c.transaction_type, TransactionType::DiscountReversal);
    }

    #[test]
    fn gift_voucher_redemption_names_amount() {
        let c = classify(&StockCode::clean("GIFT_0001_20"), "Gift Voucher £20", Quantity::new(-1), money("-20.00"), false);
        assert!(c.is_gift);
        assert_eq!(c.category, "Gift Voucher");
        assert_eq!(c.subcategory, "Voucher £20");
        assert_eq!(c.transaction_type, TransactionType::VoucherRedemption);
    }

    #[test]
    fn gift_voucher_sale() {
        let c = classify(&StockCode::clean("GIFT_0001_20"), "Gift Voucher £20", Quantity::new(1), money("20.00"), false);
        assert_eq!(c.transaction_type, TransactionType::VoucherSale);
    }

    #[test]
    fn postage_by_description_fallback() {
        let c = classify(&StockCode::clean("23456"), "POSTAGE CHARGE", Quantity::new(1), money("18.00"), false);
        assert_eq!(c.category, "Shipping");
    }

    #[test]
    fn adjustment_sign_table() {
        assert_eq!(
            classify(&StockCode::clean("DOT"), "Dotcom Postage", Quantity::new(-1), money("-1.00"), false).transaction_type,
            TransactionType::AdjustmentOut
        );
        assert_eq!(
            classify(&StockCode::clean("M"), "Manual", Quantity::new(1), money("1.00"), false).transaction_type,
            TransactionType::AdjustmentIn
        );
        assert_eq!(
            classify(&StockCode::clean("M"), "Manual", Quantity::new(0), money("0.00"), false).transaction_type,
            TransactionType::Adjustment
        );
    }

    #[test]
    fn gift_sets_prefix() {
        let c = classify(&StockCode::clean("DCGS0076"), "Gift Set", Quantity::new(1), money("5.00"), false);
        assert_eq!(c.category, "Gift Sets");
        assert_eq!(c.subcategory, "DCGS");
        assert!(c.is_gift);
    }

    #[test]
    fn service_stock_code() {
        let c = classify(&StockCode::clean("S"), "Service Charge", Quantity::new(1), money("5.00"), false);
        assert_eq!(c.transaction_type, TransactionType::Service);
    }
}
