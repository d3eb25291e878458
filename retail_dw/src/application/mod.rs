//! Application layer: orchestrates the domain services against the
//! repository ports, without knowing whether those ports are backed by
//! Postgres or an in-memory fake (tests use the latter).

pub mod dimension_resolver;
pub mod extractor;
pub mod fact_writer;
pub mod partition_manager;
pub mod pipeline;
pub mod quality_monitor;
pub mod use_cases;
pub mod versioning;

pub use dimension_resolver::DimensionResolver;
pub use extractor::{RecordSource, SourceRecord};
pub use fact_writer::FactWriter;
pub use partition_manager::PartitionManager;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use quality_monitor::QualityMonitor;
pub use use_cases::{ConnectivityUseCase, EtlUseCase, QualityUseCase, SetupUseCase, VersionsUseCase};
pub use versioning::VersionManager;
