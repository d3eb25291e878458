//! Repository contract for `fact_sales` (spec §4.6).

use async_trait::async_trait;

use crate::entities::FactRow;
use crate::EtlError;

#[async_trait]
pub trait FactRepository: Send + Sync {
    /// Bulk-inserts a batch of fact rows into their target partitions.
    /// Returns the number of rows actually inserted.
    async fn insert_batch(&self, rows: &[FactRow]) -> Result<u64, EtlError>;
}
