//! Repository contract for warehouse schema setup (spec §6 `setup`
//! command): creates the `retail_dw` schema, its tables, partitioning
//! functions, and indexes.

use async_trait::async_trait;

use crate::EtlError;

#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Applies the warehouse DDL. When `drop_existing` is set, drops the
    /// schema first (spec §6: `setup [--drop-existing]`).
    async fn apply(&self, drop_existing: bool) -> Result<(), EtlError>;

    /// Connectivity probe for the `test` command.
    async fn ping(&self) -> Result<(), EtlError>;
}
