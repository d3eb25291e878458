//! # VersionManager
//!
//! Mints a `VersionNumber` for a run and persists the `DataVersion` row.
//! Two runs starting within the same second produce the same base
//! version number; on a unique-constraint conflict the manager appends a
//! short random suffix and retries once (spec §9 open question 3).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use retail_dw_domain::entities::DataVersion;
use retail_dw_domain::repositories::VersionRepository;
use retail_dw_domain::value_objects::VersionNumber;
use retail_dw_domain::{EtlError, VersionStatus};
use tracing::warn;

pub struct VersionManager {
    repository: Arc<dyn VersionRepository>,
}

impl VersionManager {
    pub fn new(repository: Arc<dyn VersionRepository>) -> Self {
        VersionManager { repository }
    }

    pub async fn create(
        &self,
        created_at: DateTime<Utc>,
        source_file: Option<String>,
        file_hash: Option<String>,
        etl_job_id: String,
    ) -> Result<DataVersion, EtlError> {
        let base = VersionNumber::for_timestamp(created_at);
        let mut version = DataVersion {
            version_id: None,
            version_number: base.as_str().to_string(),
            version_type: "FULL".to_string(),
            created_at,
            source_file: source_file.clone(),
            file_hash: file_hash.clone(),
            records_count: 0,
            etl_job_id: etl_job_id.clone(),
            status: VersionStatus::Active,
        };

        match self.repository.create(&version).await {
            Ok(id) => {
                version.version_id = Some(retail_dw_domain::value_objects::VersionId::new(id));
                Ok(version)
            }
            Err(EtlError::VersionConflict(_)) => {
                let suffix: u16 = rand::thread_rng().gen();
                let disambiguated = base.with_suffix(&format!("{suffix:04x}"));
                warn!(version_number = %disambiguated, "version number collided, retrying with suffix");
                version.version_number = disambiguated.as_str().to_string();
                let id = self.repository.create(&version).await?;
                version.version_id = Some(retail_dw_domain::value_objects::VersionId::new(id));
                Ok(version)
            }
            Err(other) => Err(other),
        }
    }

    pub async fn finalize(&self, version_id: i64, records_count: i64, status: retail_dw_domain::RunStatus) -> Result<(), EtlError> {
        self.repository.finalize(version_id, records_count, status).await
    }

    pub async fn latest(&self) -> Result<Option<DataVersion>, EtlError> {
        self.repository.find_latest().await
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<DataVersion>, EtlError> {
        self.repository.list(limit).await
    }

    pub async fn archive_previous(&self, keep_version_id: i64) -> Result<(), EtlError> {
        for version in self.repository.list(50).await? {
            if let Some(id) = version.version_id {
                if id.value() != keep_version_id && matches!(version.status, VersionStatus::Active) {
                    self.repository.archive(id.value()).await?;
                }
            }
        }
        Ok(())
    }
}
