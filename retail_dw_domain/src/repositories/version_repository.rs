//! Repository contract for `data_versions` (spec §4.10).

use async_trait::async_trait;

use crate::entities::DataVersion;
use crate::{EtlError, RunStatus};

#[async_trait]
pub trait VersionRepository: Send + Sync {
    async fn create(&self, version: &DataVersion) -> Result<i64, EtlError>;

    /// Records the final row count and terminal status once a run
    /// completes (spec §4.10).
    async fn finalize(&self, version_id: i64, records_count: i64, status: RunStatus) -> Result<(), EtlError>;

    async fn find_latest(&self) -> Result<Option<DataVersion>, EtlError>;

    async fn find_by_number(&self, version_number: &str) -> Result<Option<DataVersion>, EtlError>;

    async fn list(&self, limit: i64) -> Result<Vec<DataVersion>, EtlError>;

    async fn archive(&self, version_id: i64) -> Result<(), EtlError>;
}
