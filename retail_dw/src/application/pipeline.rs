//! # Pipeline (C9)
//!
//! Orchestrates a single ETL run end to end: setup (version + lineage),
//! the extract/clean/transform/classify/batch loop, dimension resolution
//! and fact writes per batch, sampled quality evaluation, and lineage/
//! version finalization (spec §4.8).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use retail_dw_domain::entities::{DataLineage, FactRow, TransformedRecord};
use retail_dw_domain::repositories::LineageRepository;
use retail_dw_domain::services::cleaner::{Cleaner, CleanerConfig};
use retail_dw_domain::services::quality_rules::{BatchCounters, DimensionBatchCounters};
use retail_dw_domain::services::transformer::Transformer;
use retail_dw_domain::value_objects::BatchId;
use retail_dw_domain::{EtlError, RunStatus};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::application::extractor::RecordSource;
use crate::application::{DimensionResolver, FactWriter, PartitionManager, QualityMonitor, VersionManager};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub job_name: String,
    pub batch_size: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub checkpoint_interval: u64,
    pub quality_sample_size: usize,
    pub data_source: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            job_name: "retail-etl".to_string(),
            batch_size: 1_000,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            checkpoint_interval: 5_000,
            quality_sample_size: 1_000,
            data_source: "CSV".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub stage: &'static str,
    pub records_processed: u64,
    pub timestamp: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub job_id: String,
    pub version_number: String,
    pub status: RunStatus,
    pub records_extracted: u64,
    pub records_rejected: u64,
    pub records_loaded: u64,
    pub last_checkpoint: Option<Checkpoint>,
}

/// A broadcast flag checked at batch boundaries (spec §5: "Cancellation
/// is a broadcast flag observed at batch boundaries").
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Pipeline {
    resolver: Arc<DimensionResolver>,
    partitions: Arc<PartitionManager>,
    writer: Arc<FactWriter>,
    quality: Arc<QualityMonitor>,
    versions: Arc<VersionManager>,
    lineage: Arc<dyn LineageRepository>,
    config: PipelineConfig,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resolver: Arc<DimensionResolver>,
        partitions: Arc<PartitionManager>,
        writer: Arc<FactWriter>,
        quality: Arc<QualityMonitor>,
        versions: Arc<VersionManager>,
        lineage: Arc<dyn LineageRepository>,
        config: PipelineConfig,
    ) -> Self {
        Pipeline { resolver, partitions, writer, quality, versions, lineage, config }
    }

    #[instrument(skip(self, source, cancellation), fields(job_name = %self.config.job_name))]
    pub async fn run(
        &self,
        mut source: Box<dyn RecordSource>,
        cancellation: CancellationToken,
    ) -> Result<PipelineOutcome, EtlError> {
        let started_at = Utc::now();
        let job_id = uuid::Uuid::new_v4().to_string();

        let version = self
            .versions
            .create(started_at, Some(source.source_name()), source.file_hash(), job_id.clone())
            .await?;
        let version_id = version.version_id.expect("repository assigns a version_id on create");

        let batch_id = BatchId::new();
        let mut lineage = DataLineage::start(source.source_name(), "fact_sales", batch_id, started_at);
        let lineage_id = self.lineage.start(&lineage).await.unwrap_or_else(|err| {
            warn!(error = %err, "lineage write failed at run start, continuing without a lineage row id");
            0
        });

        let mut cleaner = Cleaner::new(CleanerConfig { today: started_at.date_naive(), ..CleanerConfig::default() });
        let transformer = Transformer::new();

        let mut records_extracted = 0u64;
        let mut records_rejected = 0u64;
        let mut records_loaded = 0u64;
        let mut counters = BatchCounters::default();
        let mut dimension_counters = DimensionBatchCounters::default();
        let sampled = Mutex::new(Vec::<TransformedRecord>::new());
        let mut batch: Vec<TransformedRecord> = Vec::with_capacity(self.config.batch_size);
        let mut last_checkpoint: Option<Checkpoint> = None;
        let mut run_failed = false;

        loop {
            if cancellation.is_cancelled() {
                info!(records_extracted, "cancellation observed at batch boundary");
                break;
            }

            match self.read_with_retry(source.as_mut()).await {
                Ok(None) => break,
                Ok(Some(raw)) => {
                    records_extracted += 1;
                    counters.total_records += 1;
                    if raw.record.customer_id.trim().is_empty() {
                        counters.null_customer_id += 1;
                    }

                    match cleaner.clean(&raw.record) {
                        Ok(outcome) => {
                            for warning in &outcome.warnings {
                                warn!(warning = %warning, "cleaning validation warning");
                            }
                            match transformer.transform(outcome.record) {
                                Ok(transformed) => {
                                    let mut guard = sampled.lock().await;
                                    if guard.len() < self.config.quality_sample_size {
                                        guard.push(transformed.clone());
                                    }
                                    drop(guard);
                                    batch.push(transformed);
                                }
                                Err(err) => {
                                    records_rejected += 1;
                                    warn!(error = %err, "record rejected during transform/classify");
                                }
                            }
                        }
                        Err(err) => {
                            records_rejected += 1;
                            if matches!(err, EtlError::RecordMalformed(_)) {
                                counters.invalid_format_rejections += 1;
                            } else {
                                counters.duplicate_rejections += 1;
                            }
                        }
                    }
                }
                Err(err) => {
                    run_failed = true;
                    lineage.status = RunStatus::Failed;
                    lineage.completed_at = Some(Utc::now());
                    lineage.records_processed = records_extracted as i64;
                    lineage.records_rejected = records_rejected as i64;
                    lineage.records_inserted = records_loaded as i64;
                    if let Err(lerr) = self.lineage.complete(&lineage).await {
                        warn!(error = %lerr, "lineage finalize failed after fatal source error");
                    }
                    return Err(err);
                }
            }

            if batch.len() >= self.config.batch_size {
                let (inserted, rejected) = self.flush_batch(&mut batch, batch_id, version_id.value(), &mut dimension_counters).await?;
                records_loaded += inserted;
                records_rejected += rejected;
            }

            if records_extracted % self.config.checkpoint_interval == 0 && records_extracted > 0 {
                last_checkpoint = Some(Checkpoint { stage: "extract_transform_load", records_processed: records_extracted, timestamp: Utc::now() });
            }
        }

        if !batch.is_empty() && !run_failed {
            let (inserted, rejected) = self.flush_batch(&mut batch, batch_id, version_id.value(), &mut dimension_counters).await?;
            records_loaded += inserted;
            records_rejected += rejected;
        }

        counters.distinct_natural_keys = counters.total_records - counters.duplicate_rejections;

        let sampled_records = sampled.into_inner();
        if !sampled_records.is_empty() {
            if let Err(err) = self.quality.evaluate_and_record(&counters, &dimension_counters, batch_id, Utc::now()).await {
                warn!(error = %err, "quality persistence failed, run status unaffected");
            }
        }

        let status = if records_rejected == 0 {
            RunStatus::Success
        } else if records_loaded > 0 {
            RunStatus::Partial
        } else {
            // Spec §8 boundary behavior: zero loaded + any rejects is
            // PARTIAL, never silently SUCCESS (§9 open question 4).
            RunStatus::Partial
        };
        let status = if cancellation.is_cancelled() { RunStatus::Cancelled } else { status };

        if let Err(err) = self.versions.finalize(version_id.value(), records_loaded as i64, status).await {
            warn!(error = %err, "version finalize failed");
        }

        lineage.lineage_id = Some(lineage_id);
        lineage.status = status;
        lineage.completed_at = Some(Utc::now());
        lineage.records_processed = records_extracted as i64;
        lineage.records_inserted = records_loaded as i64;
        lineage.records_rejected = records_rejected as i64;
        if let Err(err) = self.lineage.complete(&lineage).await {
            warn!(error = %err, "lineage finalize failed, run status still derived from data counts");
        }

        info!(records_extracted, records_rejected, records_loaded, %status, "pipeline run complete");

        Ok(PipelineOutcome {
            job_id,
            version_number: version.version_number,
            status,
            records_extracted,
            records_rejected,
            records_loaded,
            last_checkpoint,
        })
    }

    /// Retries transient `SourceUnavailable` errors with `2^attempt`
    /// second backoff, capped at 30s (spec §7, §9 retry policy).
    async fn read_with_retry(&self, source: &mut dyn RecordSource) -> Result<Option<crate::application::extractor::SourceRecord>, EtlError> {
        let mut attempt = 0u32;
        loop {
            match source.next_record().await {
                Ok(record) => return Ok(record),
                Err(EtlError::SourceUnavailable(msg)) if attempt < self.config.max_retries => {
                    let delay = Duration::from_secs(2u64.saturating_pow(attempt)).min(Duration::from_secs(30));
                    warn!(attempt, delay_secs = delay.as_secs(), "source read failed, retrying: {msg}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Returns `(records inserted, records rejected)` for the flushed
    /// batch (spec §8 invariant 2). Dimension resolution goes through
    /// `DimensionResolver::resolve_batch` - the bulk path is primary,
    /// with per-record resolution as its internal fallback - so this
    /// method only has to zip records back up with their keys.
    async fn flush_batch(
        &self,
        batch: &mut Vec<TransformedRecord>,
        batch_id: BatchId,
        version_id: i64,
        dimension_counters: &mut DimensionBatchCounters,
    ) -> Result<(u64, u64), EtlError> {
        let now = Utc::now();
        let mut unresolved = 0u64;
        let mut candidates = Vec::with_capacity(batch.len());

        for record in batch.drain(..) {
            use chrono::Datelike;
            let year = record.transaction_date.year();
            let month = record.transaction_date.month();
            if let Err(err) = self.partitions.ensure_for_date(year, month).await {
                warn!(error = %err, year, month, "partition ensure failed for batch row, rejecting row");
                unresolved += 1;
                continue;
            }
            candidates.push(record);
        }

        if candidates.is_empty() {
            return Ok((0, unresolved));
        }

        Self::tally_dimension_counters(&candidates, dimension_counters);

        let resolved = self.resolver.resolve_batch(&candidates, now).await;
        let mut fact_rows = Vec::with_capacity(candidates.len());
        for (record, result) in candidates.into_iter().zip(resolved.into_iter()) {
            match result {
                Ok(keys) => {
                    fact_rows.push(FactRow {
                        sales_key: None,
                        customer_key: keys.customer_key,
                        product_key: keys.product_key,
                        date_key: keys.date_key,
                        invoice_no: record.invoice_no.numeric(),
                        transaction_type: record.transaction_type,
                        quantity: record.quantity.magnitude(),
                        unit_price: record.unit_price,
                        line_total: record.line_total,
                        transaction_datetime: record.transaction_datetime,
                        batch_id,
                        version_id: Some(retail_dw_domain::value_objects::VersionId::new(version_id)),
                        data_source: self.config.data_source.clone(),
                    });
                }
                Err(err) => {
                    warn!(error = %err, "dimension resolution failed for record, rejecting");
                    unresolved += 1;
                }
            }
        }

        // Spec §7: a batch whose majority of rows resolved continues;
        // an all-unresolved batch is itself rejected (no insert attempt).
        if fact_rows.is_empty() {
            return Ok((0, unresolved));
        }

        let inserted = self.writer.write(&fact_rows).await?;
        Ok((inserted, unresolved))
    }

    /// Accumulates the `dim_customer`/`dim_product` quality counters
    /// (spec §4.9: metric registry fixed for fact_sales, dim_customer,
    /// dim_product) from the records a batch resolves dimensions for,
    /// counting each natural key once per flush.
    fn tally_dimension_counters(candidates: &[TransformedRecord], counters: &mut DimensionBatchCounters) {
        use std::collections::HashSet;

        let mut seen_customers = HashSet::new();
        let mut seen_products = HashSet::new();
        for record in candidates {
            if seen_customers.insert(record.customer_id.as_str().to_string()) {
                counters.customers_resolved += 1;
                if record.country.as_str().trim().is_empty() {
                    counters.customers_missing_country += 1;
                }
            }
            if seen_products.insert(record.stock_code.as_str().to_string()) {
                counters.products_resolved += 1;
                if record.category.trim().is_empty() {
                    counters.products_missing_category += 1;
                }
            }
        }
    }
}
