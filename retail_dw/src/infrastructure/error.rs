//! # Infrastructure error conversions
//!
//! The domain crate's `EtlError` stays free of `sqlx`/`csv`/`std::io`
//! (spec SPEC_FULL.md §B). This module is the one place those error
//! types cross into `EtlError`, mirroring the teacher's comment that
//! "domain uses PipelineError only" - infrastructure failures are mapped
//! down at the boundary instead of leaking a foreign error type upward.

use retail_dw_domain::EtlError;

pub fn from_sqlx(err: sqlx::Error) -> EtlError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => EtlError::VersionConflict(db_err.message().to_string()),
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => EtlError::SourceUnavailable(err.to_string()),
        _ => EtlError::Infra(err.to_string()),
    }
}

pub fn from_csv(err: csv::Error) -> EtlError {
    EtlError::RecordMalformed(err.to_string())
}

pub fn from_io(err: std::io::Error) -> EtlError {
    EtlError::SourceUnavailable(err.to_string())
}
