//! # QualityMonitor
//!
//! Computes the batch's quality metrics, persists them, evaluates the
//! two-tier alert thresholds, and logs anything that crosses them (spec
//! §4.9; alert thresholds supplement the original implementation's
//! quality-alert manager).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use retail_dw_domain::repositories::QualityRepository;
use retail_dw_domain::services::quality_rules::{self, BatchCounters, DimensionBatchCounters, QualityAlert, QualityThresholds};
use retail_dw_domain::value_objects::BatchId;
use retail_dw_domain::{AnomalySeverity, EtlError, Trend};
use tracing::{error, warn};

/// Trailing-window size for drop detection: roughly the last week of
/// daily batch runs (spec §4.9 anomaly detection, "e.g. 7-day lag").
const ANOMALY_WINDOW: i64 = 7;
/// A metric that falls this many points below its trailing average is
/// flagged regardless of whether it still clears the absolute threshold.
const ANOMALY_DROP_THRESHOLD: f64 = 15.0;

pub struct QualityMonitor {
    repository: Arc<dyn QualityRepository>,
    thresholds: QualityThresholds,
}

impl QualityMonitor {
    pub fn new(repository: Arc<dyn QualityRepository>, thresholds: QualityThresholds) -> Self {
        QualityMonitor { repository, thresholds }
    }

    /// Computes and persists the `fact_sales`, `dim_customer` and
    /// `dim_product` metrics for a batch (spec §4.9), then evaluates
    /// both the absolute-threshold alerts and, against each metric's
    /// trailing history, the drop-detection alerts.
    pub async fn evaluate_and_record(
        &self,
        counters: &BatchCounters,
        dimension_counters: &DimensionBatchCounters,
        batch_id: BatchId,
        measured_at: DateTime<Utc>,
    ) -> Result<Vec<QualityAlert>, EtlError> {
        let mut metrics = quality_rules::evaluate_batch(counters, &self.thresholds, batch_id, measured_at);
        metrics.extend(quality_rules::evaluate_dimension_batch(dimension_counters, &self.thresholds, batch_id, measured_at));

        let mut alerts = quality_rules::evaluate_alerts(&metrics);
        for metric in &metrics {
            let history = self.repository.history(&metric.table_name, &metric.metric_name, ANOMALY_WINDOW).await?;
            if let Some(alert) = quality_rules::detect_drop(metric, &history, ANOMALY_DROP_THRESHOLD) {
                alerts.push(alert);
            }
        }

        self.repository.insert_batch(&metrics).await?;

        for alert in &alerts {
            match alert.severity {
                AnomalySeverity::High => error!(metric = %alert.metric_name, table = %alert.table_name, "{}", alert.message),
                AnomalySeverity::Medium => warn!(metric = %alert.metric_name, table = %alert.table_name, "{}", alert.message),
            }
        }
        Ok(alerts)
    }

    pub async fn trend(&self, table_name: &str, metric_name: &str, limit: i64) -> Result<Option<(f64, f64, f64, Trend)>, EtlError> {
        let history = self.repository.history(table_name, metric_name, limit).await?;
        Ok(quality_rules::summarize_trend(&history))
    }
}
