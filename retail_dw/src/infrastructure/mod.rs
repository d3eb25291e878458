//! Adapters: Postgres repositories, CSV extraction, the file-backed
//! scheduler, configuration loading, logging/metrics wiring, and alert
//! delivery.

pub mod alerts;
pub mod config;
pub mod csv_extractor;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod repositories;
pub mod scheduler;

pub use alerts::{Alert, AlertLevel, AlertSink, LogAlertSink};
pub use config::AppConfig;
pub use csv_extractor::{CsvExtractor, CsvExtractorConfig};
pub use metrics::PipelineMetrics;
pub use scheduler::{ScheduleType, ScheduledJob, Scheduler};
