//! # Structured logging
//!
//! Initializes `tracing-subscriber` once at process start, console or
//! JSON formatted per `LOG_FORMAT` (spec §6 `LOG_FORMAT∈{console,json}`),
//! filtered by `LOG_LEVEL`. Mirrors the teacher's
//! `infrastructure::logging` placement and `adaptive_pipeline_bootstrap`'s
//! pattern of keeping bootstrap-phase logging separate from the
//! application's structured fields.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::infrastructure::config::MonitoringConfig;

/// Standard fields every log record carries once a `LogContext` span is
/// entered (spec §6: `timestamp, level, logger, message, job_id, job_name`).
/// `timestamp`/`level`/`logger`/`message` come from `tracing` itself; this
/// span guard binds the remaining two.
pub struct LogContext {
    _span: tracing::span::EnteredSpan,
}

impl LogContext {
    pub fn enter(job_id: &str, job_name: &str) -> Self {
        let span = tracing::info_span!("etl_run", job_id = %job_id, job_name = %job_name);
        LogContext { _span: span.entered() }
    }
}

pub fn init(monitoring: &MonitoringConfig) {
    let filter = EnvFilter::try_new(&monitoring.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    let result = if monitoring.log_format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(err) = result {
        eprintln!("logging already initialized: {err}");
    }
}
