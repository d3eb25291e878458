//! Repository contract for `fact_sales` range partitions (spec §4.7:
//! monthly partitions named `fact_sales_yYYYYmMM`, created idempotently).

use async_trait::async_trait;

use crate::EtlError;

#[async_trait]
pub trait PartitionRepository: Send + Sync {
    /// Ensures the monthly partition covering `year`/`month` exists.
    /// Idempotent: safe to call for a partition that already exists.
    async fn ensure_partition(&self, year: i32, month: u32) -> Result<String, EtlError>;

    async fn list_partitions(&self) -> Result<Vec<String>, EtlError>;
}
