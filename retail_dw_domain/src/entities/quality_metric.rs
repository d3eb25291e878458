//! # QualityMetric
//!
//! One row per `(table, column, metric_name, batch_id, measured_at)`
//! (spec §3, §4.9).

use chrono::{DateTime, Utc};

use super::data_lineage::Metadata;
use crate::value_objects::BatchId;

#[derive(Debug, Clone)]
pub struct QualityMetric {
    pub metric_id: Option<i64>,
    pub table_name: String,
    pub column_name: String,
    pub metric_name: String,
    pub metric_value: f64,
    pub threshold_value: Option<f64>,
    pub is_threshold_met: Option<bool>,
    pub batch_id: BatchId,
    pub measured_at: DateTime<Utc>,
    pub details: Metadata,
}
