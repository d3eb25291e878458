//! # Extractor port
//!
//! The pipeline pulls `RawRecord`s from a source one at a time (spec
//! §2, §6). The port is intentionally minimal: a chunked, async
//! iterator-like trait so a CSV file, a future database source, or a
//! test fixture can all stand in without the pipeline knowing which.

use async_trait::async_trait;
use retail_dw_domain::entities::RawRecord;
use retail_dw_domain::EtlError;

/// One row read from the source, or `None` once the source is
/// exhausted. Wrapping in a struct (rather than `Option<RawRecord>`
/// directly) leaves room for per-row source metadata without another
/// signature change.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    pub record: RawRecord,
}

/// A record source the `Pipeline` extracts from. Implementations read
/// in chunks internally (spec §6: "chunked read in blocks of configurable
/// size, default 1000 rows") but expose records one at a time to keep the
/// staged pipeline's control flow uniform.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Pulls the next record, or `Ok(None)` at end of source.
    /// `SourceUnavailable` is fatal per the error taxonomy (spec §7) and
    /// aborts the run.
    async fn next_record(&mut self) -> Result<Option<SourceRecord>, EtlError>;

    /// A human-readable identifier for lineage (e.g. the file path).
    fn source_name(&self) -> String;

    /// First 16 hex chars of the MD5 digest of the source bytes, if the
    /// source is file-backed (spec §3 `data_versions.file_hash`).
    fn file_hash(&self) -> Option<String> {
        None
    }
}
