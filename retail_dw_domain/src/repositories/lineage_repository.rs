//! Repository contract for `data_lineage` (spec §4.8).

use async_trait::async_trait;

use crate::entities::DataLineage;
use crate::EtlError;

#[async_trait]
pub trait LineageRepository: Send + Sync {
    async fn start(&self, lineage: &DataLineage) -> Result<i64, EtlError>;

    async fn complete(&self, lineage: &DataLineage) -> Result<(), EtlError>;

    async fn find_by_batch_id(&self, batch_id: &str) -> Result<Option<DataLineage>, EtlError>;

    async fn list_recent(&self, limit: i64) -> Result<Vec<DataLineage>, EtlError>;
}
