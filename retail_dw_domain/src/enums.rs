//! # Domain Enums
//!
//! Fixed vocabularies shared across the staged pipeline: the transaction
//! type taxonomy (spec §4.3), run/lineage status (spec §4.8, §3), quality
//! metric types (spec §4.9), and data-version status (spec §3).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Sale,
    Return,
    Fee,
    FeeReversal,
    ShippingCharge,
    ShippingRefund,
    Discount,
    DiscountReversal,
    Donation,
    AdjustmentIn,
    AdjustmentOut,
    Adjustment,
    VoucherSale,
    VoucherRedemption,
    Service,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "SALE",
            TransactionType::Return => "RETURN",
            TransactionType::Fee => "FEE",
            TransactionType::FeeReversal => "FEE_REVERSAL",
            TransactionType::ShippingCharge => "SHIPPING_CHARGE",
            TransactionType::ShippingRefund => "SHIPPING_REFUND",
            TransactionType::Discount => "DISCOUNT",
            TransactionType::DiscountReversal => "DISCOUNT_REVERSAL",
            TransactionType::Donation => "DONATION",
            TransactionType::AdjustmentIn => "ADJUSTMENT_IN",
            TransactionType::AdjustmentOut => "ADJUSTMENT_OUT",
            TransactionType::Adjustment => "ADJUSTMENT",
            TransactionType::VoucherSale => "VOUCHER_SALE",
            TransactionType::VoucherRedemption => "VOUCHER_REDEMPTION",
            TransactionType::Service => "SERVICE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Run state machine: PENDING → RUNNING → {SUCCESS, FAILED, PARTIAL,
/// CANCELLED} (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Failed,
    Partial,
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Running => "RUNNING",
            RunStatus::Success => "SUCCESS",
            RunStatus::Failed => "FAILED",
            RunStatus::Partial => "PARTIAL",
            RunStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionStatus {
    Active,
    Archived,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Active => "ACTIVE",
            VersionStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    Completeness,
    Accuracy,
    Consistency,
    Validity,
    Uniqueness,
    Timeliness,
    Integrity,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Completeness => "COMPLETENESS",
            MetricType::Accuracy => "ACCURACY",
            MetricType::Consistency => "CONSISTENCY",
            MetricType::Validity => "VALIDITY",
            MetricType::Uniqueness => "UNIQUENESS",
            MetricType::Timeliness => "TIMELINESS",
            MetricType::Integrity => "INTEGRITY",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalySeverity {
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdOperator {
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    NotEqual,
}

impl ThresholdOperator {
    pub fn evaluate(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdOperator::GreaterOrEqual => value >= threshold,
            ThresholdOperator::LessOrEqual => value <= threshold,
            ThresholdOperator::Equal => (value - threshold).abs() < f64::EPSILON,
            ThresholdOperator::NotEqual => (value - threshold).abs() >= f64::EPSILON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "IMPROVING",
            Trend::Declining => "DECLINING",
            Trend::Stable => "STABLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingValuePolicy {
    Drop,
    FillZero,
    FillUnknown,
    FillMean,
    FillMedian,
    FillMode,
}
