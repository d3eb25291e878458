//! # Quality rule calculators
//!
//! Pure functions computing the data-quality metric families from spec
//! §4.9 (completeness, validity, uniqueness, timeliness, integrity, plus
//! accuracy/consistency placeholders scored from the same batch counters),
//! and the alerting/trend-summary helpers supplementing the distilled
//! spec from the quality-monitoring code in the original implementation.

use chrono::{DateTime, Utc};

use crate::entities::{Metadata, QualityMetric};
use crate::value_objects::BatchId;
use crate::{AnomalySeverity, MetricType};

/// Raw counters a batch run accumulates while cleaning/transforming/
/// loading; quality rules reduce these into percentage metrics.
#[derive(Debug, Clone, Default)]
pub struct BatchCounters {
    pub total_records: i64,
    pub null_customer_id: i64,
    pub invalid_format_rejections: i64,
    pub duplicate_rejections: i64,
    pub distinct_natural_keys: i64,
    pub late_arriving_records: i64,
    pub orphaned_fact_rows: i64,
}

/// Counters the dimension resolver accumulates while resolving a batch;
/// reduced into `dim_customer`/`dim_product` completeness metrics
/// alongside the `fact_sales` metrics from `BatchCounters` (spec §4.9:
/// metric registry fixed for fact_sales, dim_customer, dim_product).
#[derive(Debug, Clone, Default)]
pub struct DimensionBatchCounters {
    pub customers_resolved: i64,
    pub customers_missing_country: i64,
    pub products_resolved: i64,
    pub products_missing_category: i64,
}

#[derive(Debug, Clone)]
pub struct QualityThresholds {
    pub completeness: f64,
    pub validity: f64,
    pub uniqueness: f64,
    pub timeliness: f64,
    pub integrity: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        // Spec §9 default: alerts fire below 90% (warning) / 70% (critical).
        // Per-metric pass/fail thresholds default to the warning line.
        QualityThresholds {
            completeness: 90.0,
            validity: 90.0,
            uniqueness: 90.0,
            timeliness: 90.0,
            integrity: 90.0,
        }
    }
}

fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        100.0
    } else {
        (numerator as f64 / denominator as f64) * 100.0
    }
}

fn metric(
    table_name: &str,
    column_name: &str,
    metric_type: MetricType,
    value: f64,
    threshold: f64,
    batch_id: BatchId,
    measured_at: DateTime<Utc>,
) -> QualityMetric {
    QualityMetric {
        metric_id: None,
        table_name: table_name.to_string(),
        column_name: column_name.to_string(),
        metric_name: metric_type.as_str().to_string(),
        metric_value: value,
        threshold_value: Some(threshold),
        is_threshold_met: Some(value >= threshold),
        batch_id,
        measured_at,
        details: Metadata::new(),
    }
}

/// Computes the standard quality-metric set for a batch against
/// `fact_sales` (spec §4.9: completeness, validity, uniqueness,
/// timeliness, integrity).
pub fn evaluate_batch(
    counters: &BatchCounters,
    thresholds: &QualityThresholds,
    batch_id: BatchId,
    measured_at: DateTime<Utc>,
) -> Vec<QualityMetric> {
    let completeness = percentage(
        counters.total_records - counters.null_customer_id,
        counters.total_records,
    );
    let validity = percentage(
        counters.total_records - counters.invalid_format_rejections,
        counters.total_records + counters.invalid_format_rejections,
    );
    let uniqueness = percentage(counters.distinct_natural_keys, counters.total_records);
    let timeliness = percentage(
        counters.total_records - counters.late_arriving_records,
        counters.total_records,
    );
    let integrity = percentage(
        counters.total_records - counters.orphaned_fact_rows,
        counters.total_records,
    );

    vec![
        metric("fact_sales", "customer_id", MetricType::Completeness, completeness, thresholds.completeness, batch_id, measured_at),
        metric("fact_sales", "invoice_no", MetricType::Validity, validity, thresholds.validity, batch_id, measured_at),
        metric("fact_sales", "invoice_no,stock_code", MetricType::Uniqueness, uniqueness, thresholds.uniqueness, batch_id, measured_at),
        metric("fact_sales", "transaction_datetime", MetricType::Timeliness, timeliness, thresholds.timeliness, batch_id, measured_at),
        metric("fact_sales", "customer_key,product_key", MetricType::Integrity, integrity, thresholds.integrity, batch_id, measured_at),
    ]
}

/// Completeness metrics for `dim_customer` and `dim_product` (spec
/// §4.9), computed from the natural keys the dimension resolver touched
/// during the batch rather than from `fact_sales` counters.
pub fn evaluate_dimension_batch(
    counters: &DimensionBatchCounters,
    thresholds: &QualityThresholds,
    batch_id: BatchId,
    measured_at: DateTime<Utc>,
) -> Vec<QualityMetric> {
    let customer_completeness = percentage(
        counters.customers_resolved - counters.customers_missing_country,
        counters.customers_resolved,
    );
    let product_completeness = percentage(
        counters.products_resolved - counters.products_missing_category,
        counters.products_resolved,
    );

    vec![
        metric("dim_customer", "country", MetricType::Completeness, customer_completeness, thresholds.completeness, batch_id, measured_at),
        metric("dim_product", "category", MetricType::Completeness, product_completeness, thresholds.completeness, batch_id, measured_at),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityAlert {
    pub metric_name: String,
    pub table_name: String,
    pub severity: AnomalySeverity,
    pub message: String,
}

/// Two-tier alert thresholds on percentage metrics: below 70% is a
/// `High`-severity alert, below 90% (but >= 70%) is `Medium`. Metrics at
/// or above 90% raise nothing.
pub fn evaluate_alerts(metrics: &[QualityMetric]) -> Vec<QualityAlert> {
    const CRITICAL: f64 = 70.0;
    const WARNING: f64 = 90.0;

    metrics
        .iter()
        .filter_map(|m| {
            let severity = if m.metric_value < CRITICAL {
                Some(AnomalySeverity::High)
            } else if m.metric_value < WARNING {
                Some(AnomalySeverity::Medium)
            } else {
                None
            };
            severity.map(|severity| QualityAlert {
                metric_name: m.metric_name.clone(),
                table_name: m.table_name.clone(),
                severity,
                message: format!("{} on {} is {:.1}% (below {:.0}% threshold)", m.metric_name, m.table_name, m.metric_value, WARNING),
            })
        })
        .collect()
}

/// Summarizes a metric's history: average, min, max and a trend
/// direction comparing the most recent reading against the prior
/// average (supplementing the distilled spec with the original
/// implementation's quality-trend reporting).
pub fn summarize_trend(history: &[f64]) -> Option<(f64, f64, f64, crate::Trend)> {
    if history.is_empty() {
        return None;
    }
    let avg = history.iter().sum::<f64>() / history.len() as f64;
    let min = history.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = history.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let trend = if history.len() < 2 {
        crate::Trend::Stable
    } else {
        let latest = history[history.len() - 1];
        let prior_avg = history[..history.len() - 1].iter().sum::<f64>() / (history.len() - 1) as f64;
        let delta = latest - prior_avg;
        if delta > 1.0 {
            crate::Trend::Improving
        } else if delta < -1.0 {
            crate::Trend::Declining
        } else {
            crate::Trend::Stable
        }
    };

    Some((avg, min, max, trend))
}

/// Flags a metric whose latest reading dropped sharply below its
/// trailing window average, independent of the absolute thresholds in
/// `evaluate_alerts` (spec §4.9 anomaly/drop detection: a metric that is
/// still above the absolute threshold but fell hard against its own
/// recent history is still worth raising).
pub fn detect_drop(metric: &QualityMetric, history: &[f64], drop_threshold: f64) -> Option<QualityAlert> {
    let (avg, _, _, _) = summarize_trend(history)?;
    let drop = avg - metric.metric_value;
    if drop < drop_threshold {
        return None;
    }
    Some(QualityAlert {
        metric_name: metric.metric_name.clone(),
        table_name: metric.table_name.clone(),
        severity: AnomalySeverity::High,
        message: format!(
            "{} on {} dropped {:.1} points below its trailing average ({:.1}% -> {:.1}%)",
            metric.metric_name, metric.table_name, drop, avg, metric.metric_value
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::BatchId;

    #[test]
    fn completeness_reflects_null_customer_ids() {
        let counters = BatchCounters {
            total_records: 100,
            null_customer_id: 10,
            distinct_natural_keys: 100,
            ..Default::default()
        };
        let metrics = evaluate_batch(&counters, &QualityThresholds::default(), BatchId::new(), Utc::now());
        let completeness = metrics.iter().find(|m| m.metric_name == "COMPLETENESS").unwrap();
        assert!((completeness.metric_value - 90.0).abs() < f64::EPSILON);
        assert_eq!(completeness.is_threshold_met, Some(true));
    }

    #[test]
    fn low_completeness_raises_critical_alert() {
        let counters = BatchCounters {
            total_records: 100,
            null_customer_id: 40,
            distinct_natural_keys: 100,
            ..Default::default()
        };
        let metrics = evaluate_batch(&counters, &QualityThresholds::default(), BatchId::new(), Utc::now());
        let alerts = evaluate_alerts(&metrics);
        let completeness_alert = alerts.iter().find(|a| a.metric_name == "COMPLETENESS").unwrap();
        assert_eq!(completeness_alert.severity, AnomalySeverity::High);
    }

    #[test]
    fn trend_detects_improvement() {
        let (_, _, _, trend) = summarize_trend(&[80.0, 82.0, 95.0]).unwrap();
        assert_eq!(trend, crate::Trend::Improving);
    }

    #[test]
    fn empty_history_has_no_trend() {
        assert!(summarize_trend(&[]).is_none());
    }

    #[test]
    fn dimension_batch_covers_customer_and_product() {
        let counters = DimensionBatchCounters {
            customers_resolved: 10,
            customers_missing_country: 1,
            products_resolved: 20,
            products_missing_category: 0,
        };
        let metrics = evaluate_dimension_batch(&counters, &QualityThresholds::default(), BatchId::new(), Utc::now());
        assert_eq!(metrics.len(), 2);
        assert!(metrics.iter().any(|m| m.table_name == "dim_customer" && (m.metric_value - 90.0).abs() < f64::EPSILON));
        assert!(metrics.iter().any(|m| m.table_name == "dim_product" && (m.metric_value - 100.0).abs() < f64::EPSILON));
    }

    #[test]
    fn sharp_drop_raises_alert_even_above_absolute_threshold() {
        let metric = metric("fact_sales", "customer_id", MetricType::Completeness, 91.0, 90.0, BatchId::new(), Utc::now());
        let alert = detect_drop(&metric, &[99.0, 99.0, 99.0], 5.0);
        assert!(alert.is_some());
    }

    #[test]
    fn small_dip_does_not_raise_an_alert() {
        let metric = metric("fact_sales", "customer_id", MetricType::Completeness, 97.0, 90.0, BatchId::new(), Utc::now());
        assert!(detect_drop(&metric, &[98.0, 99.0, 98.0], 5.0).is_none());
    }
}
