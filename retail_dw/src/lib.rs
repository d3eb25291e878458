//! # Retail Data Warehouse ETL
//!
//! Loads retail transaction extracts into a dimensional Postgres
//! warehouse: clean, classify, resolve dimensions, write facts, track
//! lineage and quality, all behind the command surface in
//! `retail_dw_bootstrap::cli`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ retail_dw_bootstrap (CLI parsing, shutdown signals)          │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │ application (Pipeline, DimensionResolver, FactWriter,        │
//! │ PartitionManager, QualityMonitor, VersionManager, use cases) │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │ retail_dw_domain (entities, value objects, repository ports) │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │ infrastructure (Postgres repositories, CSV extraction,       │
//! │ scheduler, config, logging, metrics, alerts)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The application layer depends only on the domain's repository
//! traits, never on `infrastructure` directly; `main.rs` wires the
//! Postgres implementations in at startup.

pub mod application;
pub mod infrastructure;
