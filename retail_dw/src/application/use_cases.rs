//! # Use cases
//!
//! Thin, CLI-facing entry points that compose the application services
//! without knowing whether the repository ports they hold are backed by
//! Postgres or (in tests) an in-memory fake. Mirrors the teacher's
//! `application/use_cases` placement, one function per command surface
//! verb from spec §6.

use std::sync::Arc;

use retail_dw_domain::repositories::{QualityRepository, SchemaRepository, VersionRepository};
use retail_dw_domain::value_objects::BatchId;
use retail_dw_domain::EtlError;
use tracing::info;

use crate::application::extractor::RecordSource;
use crate::application::pipeline::{CancellationToken, Pipeline, PipelineOutcome};
use crate::application::QualityMonitor;

pub struct EtlUseCase {
    pipeline: Arc<Pipeline>,
}

impl EtlUseCase {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        EtlUseCase { pipeline }
    }

    pub async fn run(&self, source: Box<dyn RecordSource>) -> Result<PipelineOutcome, EtlError> {
        info!("starting etl run");
        self.pipeline.run(source, CancellationToken::new()).await
    }
}

pub struct SetupUseCase {
    schema: Arc<dyn SchemaRepository>,
}

impl SetupUseCase {
    pub fn new(schema: Arc<dyn SchemaRepository>) -> Self {
        SetupUseCase { schema }
    }

    pub async fn run(&self, drop_existing: bool) -> Result<(), EtlError> {
        self.schema.apply(drop_existing).await
    }
}

pub struct ConnectivityUseCase {
    schema: Arc<dyn SchemaRepository>,
}

impl ConnectivityUseCase {
    pub fn new(schema: Arc<dyn SchemaRepository>) -> Self {
        ConnectivityUseCase { schema }
    }

    pub async fn run(&self) -> Result<(), EtlError> {
        self.schema.ping().await
    }
}

pub struct VersionsUseCase {
    versions: Arc<dyn VersionRepository>,
}

impl VersionsUseCase {
    pub fn new(versions: Arc<dyn VersionRepository>) -> Self {
        VersionsUseCase { versions }
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<retail_dw_domain::entities::DataVersion>, EtlError> {
        self.versions.list(limit).await
    }

    pub async fn show(&self, version_number: &str) -> Result<Option<retail_dw_domain::entities::DataVersion>, EtlError> {
        self.versions.find_by_number(version_number).await
    }
}

pub struct QualityUseCase {
    monitor: Arc<QualityMonitor>,
    repository: Arc<dyn QualityRepository>,
}

impl QualityUseCase {
    pub fn new(monitor: Arc<QualityMonitor>, repository: Arc<dyn QualityRepository>) -> Self {
        QualityUseCase { monitor, repository }
    }

    /// `quality check --table <name>`: runs every registered metric for
    /// the table against a zeroed counter set (an on-demand check has no
    /// in-flight batch, so it reports against the most recent persisted
    /// history instead of recomputing from raw rows).
    pub async fn check(&self, table_name: &str) -> Result<Vec<(String, f64, Option<bool>)>, EtlError> {
        let names = ["COMPLETENESS", "VALIDITY", "UNIQUENESS", "TIMELINESS", "INTEGRITY"];
        let mut rows = Vec::new();
        for name in names {
            let history = self.repository.history(table_name, name, 1).await?;
            if let Some(latest) = history.last() {
                rows.push((name.to_string(), *latest, Some(*latest >= 90.0)));
            }
        }
        Ok(rows)
    }

    /// `quality report --table <name>`: trend summary per metric (spec
    /// §4.9). Drop-detection alerts themselves fire during the live
    /// pipeline run (`QualityMonitor::evaluate_and_record`); this report
    /// only surfaces the trailing-window trend, which works for any
    /// registered table (`fact_sales`, `dim_customer`, `dim_product`).
    pub async fn report(&self, table_name: &str) -> Result<Vec<(String, Option<(f64, f64, f64, retail_dw_domain::Trend)>)>, EtlError> {
        let names = ["COMPLETENESS", "VALIDITY", "UNIQUENESS", "TIMELINESS", "INTEGRITY"];
        let mut rows = Vec::new();
        for name in names {
            let trend = self.monitor.trend(table_name, name, 7).await?;
            rows.push((name.to_string(), trend));
        }
        Ok(rows)
    }
}

/// Generates a fresh batch id for an on-demand quality check, since it
/// runs outside any pipeline run (used by `QualityUseCase` callers that
/// need to tag ad hoc metric rows).
pub fn adhoc_batch_id() -> BatchId {
    BatchId::new()
}
