//! Repository contracts for the SCD Type 1 dimension tables (spec §4.5,
//! §9 open question: SCD Type 1 retained - updates overwrite in place,
//! no history rows).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{DimCustomer, DimDate, DimProduct};
use crate::EtlError;

#[async_trait]
pub trait CustomerDimensionRepository: Send + Sync {
    /// Inserts the customer if absent; does nothing if the natural key
    /// already exists (spec §4.5: "customer: insert-or-ignore").
    async fn upsert(&self, customer: &DimCustomer) -> Result<i64, EtlError>;

    async fn find_key_by_customer_id(&self, customer_id: &str) -> Result<Option<i64>, EtlError>;

    /// Batched form of `find_key_by_customer_id` for the primary bulk
    /// resolution path (spec §4.5: "batched `WHERE natural_key IN (...)`
    /// lookup"): one round trip for every distinct `customer_id` in a
    /// batch. Keyed by the surviving rows' natural key; ids not found
    /// are simply absent from the result.
    async fn find_keys_by_customer_ids(&self, customer_ids: &[String]) -> Result<HashMap<String, i64>, EtlError>;

    /// Upserts every customer in a single transaction, returning the
    /// surrogate key assigned to each natural key.
    async fn upsert_batch(&self, customers: &[DimCustomer]) -> Result<HashMap<String, i64>, EtlError>;
}

#[async_trait]
pub trait ProductDimensionRepository: Send + Sync {
    /// Inserts the product, or updates its mutable attributes in place
    /// if the natural key already exists (spec §4.5: "product:
    /// insert-or-update", merged per `DimProduct::merge_attributes`).
    async fn upsert(&self, product: &DimProduct) -> Result<i64, EtlError>;

    async fn find_key_by_stock_code(&self, stock_code: &str) -> Result<Option<i64>, EtlError>;

    async fn find_by_stock_code(&self, stock_code: &str) -> Result<Option<DimProduct>, EtlError>;

    /// Batched form of `find_by_stock_code`, returning full rows (not
    /// just keys) so the bulk path can fold `merge_attributes` against
    /// each product's current state before writing it back.
    async fn find_by_stock_codes(&self, stock_codes: &[String]) -> Result<HashMap<String, DimProduct>, EtlError>;

    /// Upserts every product in a single transaction, returning the
    /// surrogate key assigned to each natural key.
    async fn upsert_batch(&self, products: &[DimProduct]) -> Result<HashMap<String, i64>, EtlError>;
}

#[async_trait]
pub trait DateDimensionRepository: Send + Sync {
    /// Inserts the date row if absent (spec §4.5: "date: insert-or-ignore").
    async fn upsert(&self, date: &DimDate) -> Result<i64, EtlError>;

    async fn find_key_by_date_key(&self, date_key: i32) -> Result<Option<i64>, EtlError>;

    /// Batched form of `find_key_by_date_key`, keyed by the `date_key`
    /// surrogate value (which doubles as the natural key here).
    async fn find_keys_by_date_keys(&self, date_keys: &[i32]) -> Result<HashMap<i32, i64>, EtlError>;

    /// Upserts every date in a single transaction, returning the
    /// surrogate key assigned to each date key.
    async fn upsert_batch(&self, dates: &[DimDate]) -> Result<HashMap<i32, i64>, EtlError>;
}
