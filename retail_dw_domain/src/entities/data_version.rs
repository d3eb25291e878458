//! # DataVersion
//!
//! One row per pipeline run (spec §3, §4.10).

use chrono::{DateTime, Utc};

use crate::value_objects::VersionId;
use crate::VersionStatus;

#[derive(Debug, Clone)]
pub struct DataVersion {
    pub version_id: Option<VersionId>,
    pub version_number: String,
    pub version_type: String,
    pub created_at: DateTime<Utc>,
    pub source_file: Option<String>,
    /// First 16 hex chars of the MD5 digest of the source bytes; `None`
    /// for non-file sources (spec §3, §4.10).
    pub file_hash: Option<String>,
    pub records_count: i64,
    pub etl_job_id: String,
    pub status: VersionStatus,
}
