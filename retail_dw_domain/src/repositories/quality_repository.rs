//! Repository contract for `data_quality_metrics` (spec §4.9).

use async_trait::async_trait;

use crate::entities::QualityMetric;
use crate::EtlError;

#[async_trait]
pub trait QualityRepository: Send + Sync {
    async fn insert_batch(&self, metrics: &[QualityMetric]) -> Result<(), EtlError>;

    /// History of a single metric's value over its most recent
    /// measurements, oldest first - feeds `quality_rules::summarize_trend`.
    async fn history(&self, table_name: &str, metric_name: &str, limit: i64) -> Result<Vec<f64>, EtlError>;
}
