//! # Lineage repository (Postgres)
//!
//! One row per pipeline run (spec §4.8, §3).

use async_trait::async_trait;
use retail_dw_domain::entities::DataLineage;
use retail_dw_domain::repositories::LineageRepository;
use retail_dw_domain::{EtlError, RunStatus};
use sqlx::PgPool;

use crate::infrastructure::error::from_sqlx;

pub struct PgLineageRepository {
    pool: PgPool,
}

impl PgLineageRepository {
    pub fn new(pool: PgPool) -> Self {
        PgLineageRepository { pool }
    }
}

fn metadata_json(metadata: &retail_dw_domain::entities::Metadata) -> serde_json::Value {
    serde_json::to_value(metadata).unwrap_or(serde_json::Value::Null)
}

fn status_from_str(value: &str) -> RunStatus {
    match value {
        "SUCCESS" => RunStatus::Success,
        "FAILED" => RunStatus::Failed,
        "PARTIAL" => RunStatus::Partial,
        "CANCELLED" => RunStatus::Cancelled,
        "PENDING" => RunStatus::Pending,
        _ => RunStatus::Running,
    }
}

#[async_trait]
impl LineageRepository for PgLineageRepository {
    async fn start(&self, lineage: &DataLineage) -> Result<i64, EtlError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO retail_dw.data_lineage
                (source_system, source_table, source_file, target_table, batch_id,
                 records_processed, records_inserted, records_updated, records_rejected,
                 started_at, status, job_metadata)
            VALUES ($1, $2, $3, $4, $5, 0, 0, 0, 0, $6, $7, $8)
            RETURNING lineage_id
            "#,
        )
        .bind(&lineage.source_system)
        .bind(&lineage.source_table)
        .bind(&lineage.source_file)
        .bind(&lineage.target_table)
        .bind(lineage.batch_id.value())
        .bind(lineage.started_at)
        .bind(lineage.status.as_str())
        .bind(metadata_json(&lineage.job_metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(id)
    }

    async fn complete(&self, lineage: &DataLineage) -> Result<(), EtlError> {
        let Some(lineage_id) = lineage.lineage_id else {
            return Err(EtlError::Internal("lineage row has no id to finalize".to_string()));
        };
        sqlx::query(
            r#"
            UPDATE retail_dw.data_lineage
            SET records_processed = $2, records_inserted = $3, records_updated = $4,
                records_rejected = $5, completed_at = $6, status = $7
            WHERE lineage_id = $1
            "#,
        )
        .bind(lineage_id)
        .bind(lineage.records_processed)
        .bind(lineage.records_inserted)
        .bind(lineage.records_updated)
        .bind(lineage.records_rejected)
        .bind(lineage.completed_at)
        .bind(lineage.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn find_by_batch_id(&self, batch_id: &str) -> Result<Option<DataLineage>, EtlError> {
        let id = uuid::Uuid::parse_str(batch_id).map_err(|err| EtlError::RecordMalformed(err.to_string()))?;
        let row = sqlx::query_as::<_, LineageRow>(
            "SELECT lineage_id, source_system, source_table, source_file, target_table, batch_id, \
                    records_processed, records_inserted, records_updated, records_rejected, \
                    started_at, completed_at, status, job_metadata \
             FROM retail_dw.data_lineage WHERE batch_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(Into::into))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<DataLineage>, EtlError> {
        let rows = sqlx::query_as::<_, LineageRow>(
            "SELECT lineage_id, source_system, source_table, source_file, target_table, batch_id, \
                    records_processed, records_inserted, records_updated, records_rejected, \
                    started_at, completed_at, status, job_metadata \
             FROM retail_dw.data_lineage ORDER BY started_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(sqlx::FromRow)]
struct LineageRow {
    lineage_id: i64,
    source_system: String,
    source_table: Option<String>,
    source_file: Option<String>,
    target_table: String,
    batch_id: uuid::Uuid,
    records_processed: i64,
    records_inserted: i64,
    records_updated: i64,
    records_rejected: i64,
    started_at: chrono::DateTime<chrono::Utc>,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    status: String,
    job_metadata: serde_json::Value,
}

impl From<LineageRow> for DataLineage {
    fn from(row: LineageRow) -> Self {
        let job_metadata = serde_json::from_value(row.job_metadata).unwrap_or_default();
        DataLineage {
            lineage_id: Some(row.lineage_id),
            source_system: row.source_system,
            source_table: row.source_table,
            source_file: row.source_file,
            target_table: row.target_table,
            batch_id: retail_dw_domain::value_objects::BatchId::from_uuid(row.batch_id),
            records_processed: row.records_processed,
            records_inserted: row.records_inserted,
            records_updated: row.records_updated,
            records_rejected: row.records_rejected,
            started_at: row.started_at,
            completed_at: row.completed_at,
            status: status_from_str(&row.status),
            job_metadata,
        }
    }
}
