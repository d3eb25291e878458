//! # Quality repository (Postgres)
//!
//! Persists per-batch quality metrics and serves the trend history that
//! `QualityMonitor::trend` reads back (spec §4.9, §10).

use async_trait::async_trait;
use retail_dw_domain::entities::QualityMetric;
use retail_dw_domain::repositories::QualityRepository;
use retail_dw_domain::EtlError;
use sqlx::PgPool;

use crate::infrastructure::error::from_sqlx;

pub struct PgQualityRepository {
    pool: PgPool,
}

impl PgQualityRepository {
    pub fn new(pool: PgPool) -> Self {
        PgQualityRepository { pool }
    }
}

#[async_trait]
impl QualityRepository for PgQualityRepository {
    async fn insert_batch(&self, metrics: &[QualityMetric]) -> Result<(), EtlError> {
        if metrics.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(from_sqlx)?;
        for metric in metrics {
            let details = serde_json::to_value(&metric.details).unwrap_or(serde_json::Value::Null);
            sqlx::query(
                r#"
                INSERT INTO retail_dw.data_quality_metrics
                    (table_name, column_name, metric_name, metric_value, threshold_value,
                     is_threshold_met, batch_id, measured_at, details)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(&metric.table_name)
            .bind(&metric.column_name)
            .bind(&metric.metric_name)
            .bind(metric.metric_value)
            .bind(metric.threshold_value)
            .bind(metric.is_threshold_met)
            .bind(metric.batch_id.value())
            .bind(metric.measured_at)
            .bind(details)
            .execute(&mut *tx)
            .await
            .map_err(from_sqlx)?;
        }
        tx.commit().await.map_err(from_sqlx)?;
        Ok(())
    }

    async fn history(&self, table_name: &str, metric_name: &str, limit: i64) -> Result<Vec<f64>, EtlError> {
        let rows: Vec<(f64,)> = sqlx::query_as(
            r#"
            SELECT metric_value FROM (
                SELECT metric_value, measured_at
                FROM retail_dw.data_quality_metrics
                WHERE table_name = $1 AND metric_name = $2
                ORDER BY measured_at DESC
                LIMIT $3
            ) recent
            ORDER BY measured_at ASC
            "#,
        )
        .bind(table_name)
        .bind(metric_name)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(rows.into_iter().map(|(value,)| value).collect())
    }
}
