//! # DataLineage
//!
//! One row per pipeline run, tracking source/target and counts (spec §3).

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::value_objects::BatchId;
use crate::RunStatus;

/// Unstructured key-value metadata. Kept string-keyed/string-valued in
/// the domain layer so it stays free of a serialization-format
/// dependency (JSON encoding is an infrastructure concern).
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct DataLineage {
    pub lineage_id: Option<i64>,
    pub source_system: String,
    pub source_table: Option<String>,
    pub source_file: Option<String>,
    pub target_table: String,
    pub batch_id: BatchId,
    pub records_processed: i64,
    pub records_inserted: i64,
    pub records_updated: i64,
    pub records_rejected: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub job_metadata: Metadata,
}

impl DataLineage {
    pub fn start(source_file: String, target_table: impl Into<String>, batch_id: BatchId, started_at: DateTime<Utc>) -> Self {
        DataLineage {
            lineage_id: None,
            source_system: "CSV".to_string(),
            source_table: None,
            source_file: Some(source_file),
            target_table: target_table.into(),
            batch_id,
            records_processed: 0,
            records_inserted: 0,
            records_updated: 0,
            records_rejected: 0,
            started_at,
            completed_at: None,
            status: RunStatus::Running,
            job_metadata: Metadata::new(),
        }
    }
}
