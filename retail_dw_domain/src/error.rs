// /////////////////////////////////////////////////////////////////////////////
// Retail Data Warehouse ETL
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A hierarchical error type for the retail ETL domain. Errors are grouped
//! by the subsystem that raises them (cleaning, transform, classification,
//! dimension resolution, partitioning, versioning, quality) so that the
//! pipeline orchestrator can apply the recovery policy from the error
//! taxonomy without downcasting.
//!
//! Infrastructure failures (I/O, SQL) are mapped into `EtlError::Infra` at
//! the boundary where they cross into the domain - the domain itself never
//! depends on `sqlx` or `std::io`.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum EtlError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("record rejected: {0}")]
    RecordRejected(String),

    #[error("record malformed: {0}")]
    RecordMalformed(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("dimension resolution failed: {0}")]
    DimensionResolutionFailed(String),

    #[error("partition creation failed: {0}")]
    PartitionCreateFailed(String),

    #[error("version conflict: {0}")]
    VersionConflict(String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("infrastructure error: {0}")]
    Infra(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EtlError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn record_rejected(msg: impl Into<String>) -> Self {
        Self::RecordRejected(msg.into())
    }

    pub fn infra(msg: impl Into<String>) -> Self {
        Self::Infra(msg.into())
    }

    /// Whether the taxonomy in spec §7 treats this error as a fatal,
    /// run-aborting failure rather than a per-record/per-batch rejection.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EtlError::SourceUnavailable(_) | EtlError::PartitionCreateFailed(_)
        )
    }
}
