//! # FactWriter
//!
//! Batches `FactRow`s and inserts them through `FactRepository`,
//! chunking so a single run never sends an unbounded single statement
//! (spec §4.6, §4.7).

use std::sync::Arc;

use retail_dw_domain::entities::FactRow;
use retail_dw_domain::repositories::FactRepository;
use retail_dw_domain::EtlError;
use tracing::info;

const DEFAULT_CHUNK_SIZE: usize = 1_000;

pub struct FactWriter {
    repository: Arc<dyn FactRepository>,
    chunk_size: usize,
}

impl FactWriter {
    pub fn new(repository: Arc<dyn FactRepository>) -> Self {
        FactWriter { repository, chunk_size: DEFAULT_CHUNK_SIZE }
    }

    pub fn with_chunk_size(repository: Arc<dyn FactRepository>, chunk_size: usize) -> Self {
        FactWriter { repository, chunk_size: chunk_size.max(1) }
    }

    pub async fn write(&self, rows: &[FactRow]) -> Result<u64, EtlError> {
        let mut total_inserted = 0u64;
        for chunk in rows.chunks(self.chunk_size) {
            let inserted = self.repository.insert_batch(chunk).await?;
            total_inserted += inserted;
        }
        info!(rows = rows.len(), inserted = total_inserted, "fact batch written");
        Ok(total_inserted)
    }
}
