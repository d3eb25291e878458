//! # Metrics registry
//!
//! Prometheus counters/histograms for the staged pipeline, owned by the
//! composition root and passed down by reference (spec SPEC_FULL.md §B;
//! mirrors the teacher's `infrastructure::metrics` placement).

use prometheus::{register_histogram_with_registry, register_int_counter_with_registry, Histogram, IntCounter, Registry};

pub struct PipelineMetrics {
    pub records_extracted: IntCounter,
    pub records_cleaned: IntCounter,
    pub records_rejected: IntCounter,
    pub records_loaded: IntCounter,
    pub batch_write_duration: Histogram,
    pub dimension_resolve_duration: Histogram,
}

impl PipelineMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(PipelineMetrics {
            records_extracted: register_int_counter_with_registry!("etl_records_extracted_total", "Records read from the source", registry)?,
            records_cleaned: register_int_counter_with_registry!("etl_records_cleaned_total", "Records that passed cleaning", registry)?,
            records_rejected: register_int_counter_with_registry!("etl_records_rejected_total", "Records rejected at any stage", registry)?,
            records_loaded: register_int_counter_with_registry!("etl_records_loaded_total", "Fact rows inserted", registry)?,
            batch_write_duration: register_histogram_with_registry!("etl_batch_write_duration_seconds", "Fact batch write latency", registry)?,
            dimension_resolve_duration: register_histogram_with_registry!(
                "etl_dimension_resolve_duration_seconds",
                "Per-record dimension resolution latency",
                registry
            )?,
        })
    }
}

pub fn new_registry() -> Registry {
    Registry::new()
}
