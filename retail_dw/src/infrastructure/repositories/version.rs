//! # Version repository (Postgres)
//!
//! Persists `data_versions` rows (spec §4.10). `version_number` carries a
//! unique constraint; a collision surfaces as `EtlError::VersionConflict`
//! via `from_sqlx`, which `VersionManager::create` retries with a random
//! suffix (spec §9 open question 3).

use async_trait::async_trait;
use retail_dw_domain::entities::DataVersion;
use retail_dw_domain::repositories::VersionRepository;
use retail_dw_domain::value_objects::VersionId;
use retail_dw_domain::{EtlError, RunStatus, VersionStatus};
use sqlx::PgPool;

use crate::infrastructure::error::from_sqlx;

pub struct PgVersionRepository {
    pool: PgPool,
}

impl PgVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        PgVersionRepository { pool }
    }
}

fn version_status_from_str(value: &str) -> VersionStatus {
    match value {
        "ARCHIVED" => VersionStatus::Archived,
        _ => VersionStatus::Active,
    }
}

#[async_trait]
impl VersionRepository for PgVersionRepository {
    async fn create(&self, version: &DataVersion) -> Result<i64, EtlError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO retail_dw.data_versions
                (version_number, version_type, created_at, source_file, file_hash,
                 records_count, etl_job_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING version_id
            "#,
        )
        .bind(&version.version_number)
        .bind(&version.version_type)
        .bind(version.created_at)
        .bind(&version.source_file)
        .bind(&version.file_hash)
        .bind(version.records_count)
        .bind(&version.etl_job_id)
        .bind(version.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(id)
    }

    async fn finalize(&self, version_id: i64, records_count: i64, status: RunStatus) -> Result<(), EtlError> {
        sqlx::query("UPDATE retail_dw.data_versions SET records_count = $2, run_status = $3 WHERE version_id = $1")
            .bind(version_id)
            .bind(records_count)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(from_sqlx)?;
        Ok(())
    }

    async fn find_latest(&self) -> Result<Option<DataVersion>, EtlError> {
        let row = sqlx::query_as::<_, VersionRow>(
            "SELECT version_id, version_number, version_type, created_at, source_file, file_hash, \
                    records_count, etl_job_id, status \
             FROM retail_dw.data_versions ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_number(&self, version_number: &str) -> Result<Option<DataVersion>, EtlError> {
        let row = sqlx::query_as::<_, VersionRow>(
            "SELECT version_id, version_number, version_type, created_at, source_file, file_hash, \
                    records_count, etl_job_id, status \
             FROM retail_dw.data_versions WHERE version_number = $1",
        )
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(Into::into))
    }

    async fn list(&self, limit: i64) -> Result<Vec<DataVersion>, EtlError> {
        let rows = sqlx::query_as::<_, VersionRow>(
            "SELECT version_id, version_number, version_type, created_at, source_file, file_hash, \
                    records_count, etl_job_id, status \
             FROM retail_dw.data_versions ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn archive(&self, version_id: i64) -> Result<(), EtlError> {
        sqlx::query("UPDATE retail_dw.data_versions SET status = 'ARCHIVED' WHERE version_id = $1")
            .bind(version_id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx)?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct VersionRow {
    version_id: i64,
    version_number: String,
    version_type: String,
    created_at: chrono::DateTime<chrono::Utc>,
    source_file: Option<String>,
    file_hash: Option<String>,
    records_count: i64,
    etl_job_id: String,
    status: String,
}

impl From<VersionRow> for DataVersion {
    fn from(row: VersionRow) -> Self {
        DataVersion {
            version_id: Some(VersionId::new(row.version_id)),
            version_number: row.version_number,
            version_type: row.version_type,
            created_at: row.created_at,
            source_file: row.source_file,
            file_hash: row.file_hash,
            records_count: row.records_count,
            etl_job_id: row.etl_job_id,
            status: version_status_from_str(&row.status),
        }
    }
}
