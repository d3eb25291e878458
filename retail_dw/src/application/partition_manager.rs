//! # PartitionManager
//!
//! Ensures the monthly `fact_sales` partition for an incoming batch's
//! date range exists before the fact writer inserts into it (spec
//! §4.7). Tracks which (year, month) pairs it has already confirmed
//! this run so repeated rows in the same month don't re-issue DDL.

use std::collections::HashSet;
use std::sync::Arc;

use retail_dw_domain::repositories::PartitionRepository;
use retail_dw_domain::EtlError;
use tokio::sync::Mutex;
use tracing::info;

pub struct PartitionManager {
    repository: Arc<dyn PartitionRepository>,
    confirmed: Mutex<HashSet<(i32, u32)>>,
}

impl PartitionManager {
    pub fn new(repository: Arc<dyn PartitionRepository>) -> Self {
        PartitionManager {
            repository,
            confirmed: Mutex::new(HashSet::new()),
        }
    }

    pub async fn ensure_for_date(&self, year: i32, month: u32) -> Result<(), EtlError> {
        {
            let confirmed = self.confirmed.lock().await;
            if confirmed.contains(&(year, month)) {
                return Ok(());
            }
        }
        let partition_name = self.repository.ensure_partition(year, month).await?;
        info!(partition = %partition_name, year, month, "partition ready");
        self.confirmed.lock().await.insert((year, month));
        Ok(())
    }
}
