//! # Fact repository (Postgres)
//!
//! Bulk-inserts `fact_sales` rows within a single transaction per batch
//! (spec §4.6). Falls back to per-row inserts on a batch failure so one
//! malformed row doesn't lose the whole batch, mirroring the
//! per-row-fallback pattern used by the reference inventory batch
//! repository in the retrieval pack.

use std::sync::Arc;

use async_trait::async_trait;
use retail_dw_domain::entities::FactRow;
use retail_dw_domain::repositories::FactRepository;
use retail_dw_domain::EtlError;
use sqlx::PgPool;
use tracing::warn;

use crate::infrastructure::error::from_sqlx;
use crate::infrastructure::metrics::PipelineMetrics;

pub struct PgFactRepository {
    pool: PgPool,
    metrics: Option<Arc<PipelineMetrics>>,
}

impl PgFactRepository {
    pub fn new(pool: PgPool) -> Self {
        PgFactRepository { pool, metrics: None }
    }

    pub fn with_metrics(pool: PgPool, metrics: Arc<PipelineMetrics>) -> Self {
        PgFactRepository { pool, metrics: Some(metrics) }
    }

    async fn insert_row(&self, tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, row: &FactRow) -> Result<(), EtlError> {
        sqlx::query(
            r#"
            INSERT INTO retail_dw.fact_sales
                (customer_key, product_key, date_key, invoice_no, transaction_type, quantity,
                 unit_price, line_total, transaction_datetime, batch_id, version_id, data_source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(row.customer_key)
        .bind(row.product_key)
        .bind(row.date_key.value())
        .bind(row.invoice_no)
        .bind(row.transaction_type.as_str())
        .bind(row.quantity)
        .bind(row.unit_price.as_decimal())
        .bind(row.line_total.as_decimal())
        .bind(row.transaction_datetime)
        .bind(row.batch_id.value())
        .bind(row.version_id.map(|id| id.value()))
        .bind(&row.data_source)
        .execute(&mut **tx)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl FactRepository for PgFactRepository {
    async fn insert_batch(&self, rows: &[FactRow]) -> Result<u64, EtlError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let timer = self.metrics.as_ref().map(|m| m.batch_write_duration.start_timer());

        let result = self.insert_batch_inner(rows).await;
        if let Some(timer) = timer {
            timer.observe_duration();
        }
        if let (Ok(inserted), Some(metrics)) = (&result, &self.metrics) {
            metrics.records_loaded.inc_by(*inserted);
        }
        result
    }
}

impl PgFactRepository {
    async fn insert_batch_inner(&self, rows: &[FactRow]) -> Result<u64, EtlError> {
        let mut tx = self.pool.begin().await.map_err(from_sqlx)?;
        let mut failed = false;
        for row in rows {
            if self.insert_row(&mut tx, row).await.is_err() {
                failed = true;
                break;
            }
        }

        if !failed {
            tx.commit().await.map_err(from_sqlx)?;
            return Ok(rows.len() as u64);
        }

        // The batch transaction aborted on a constraint violation
        // (spec §7 per-row rejection rather than aborting the run):
        // retry row by row, each in its own transaction, so the rows
        // that do satisfy the constraints still land.
        warn!(rows = rows.len(), "batch insert failed, retrying row by row");
        let mut inserted = 0u64;
        for row in rows {
            let mut row_tx = self.pool.begin().await.map_err(from_sqlx)?;
            match self.insert_row(&mut row_tx, row).await {
                Ok(()) => {
                    row_tx.commit().await.map_err(from_sqlx)?;
                    inserted += 1;
                }
                Err(err) => {
                    warn!(error = %err, sales_key = ?row.sales_key, invoice_no = row.invoice_no, "fact row rejected");
                    row_tx.rollback().await.map_err(from_sqlx)?;
                }
            }
        }
        Ok(inserted)
    }
}
