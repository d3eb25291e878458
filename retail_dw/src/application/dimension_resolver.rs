//! # DimensionResolver
//!
//! Resolves a `TransformedRecord`'s natural keys to surrogate keys,
//! consulting the write-through `DimensionCache` before round-tripping to
//! the dimension repositories (spec §4.4, §4.5).
//!
//! `resolve_batch` is the primary path a flushed batch takes: one batched
//! `WHERE natural_key IN (...)` lookup plus one bulk upsert per
//! dimension, each inside a single transaction (spec §4.5 step 4).
//! `resolve` (single record) is kept as the fallback used only when the
//! bulk path itself errors.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use retail_dw_domain::dimension_cache::DimensionCache;
use retail_dw_domain::entities::{DimCustomer, DimDate, DimProduct, TransformedRecord};
use retail_dw_domain::repositories::{CustomerDimensionRepository, DateDimensionRepository, ProductDimensionRepository};
use retail_dw_domain::value_objects::DateKey;
use retail_dw_domain::EtlError;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct ResolvedKeys {
    pub customer_key: i64,
    pub product_key: i64,
    pub date_key: DateKey,
    pub date_surrogate_key: i64,
}

pub struct DimensionResolver {
    customers: Arc<dyn CustomerDimensionRepository>,
    products: Arc<dyn ProductDimensionRepository>,
    dates: Arc<dyn DateDimensionRepository>,
    cache: Mutex<DimensionCache>,
    /// Last-known attributes behind each cached key, so a cache hit in
    /// the per-record fallback path can still detect a changed
    /// attribute and re-persist it instead of a bare short-circuit
    /// silently dropping the merge.
    customer_countries: Mutex<HashMap<String, String>>,
    product_attrs: Mutex<HashMap<String, DimProduct>>,
    data_source: String,
}

impl DimensionResolver {
    pub fn new(
        customers: Arc<dyn CustomerDimensionRepository>,
        products: Arc<dyn ProductDimensionRepository>,
        dates: Arc<dyn DateDimensionRepository>,
        data_source: impl Into<String>,
    ) -> Self {
        DimensionResolver {
            customers,
            products,
            dates,
            cache: Mutex::new(DimensionCache::new()),
            customer_countries: Mutex::new(HashMap::new()),
            product_attrs: Mutex::new(HashMap::new()),
            data_source: data_source.into(),
        }
    }

    /// Resolves a whole flushed batch, one result per input record in
    /// the same order. Tries the bulk path first; if the bulk
    /// repository calls themselves error, falls back to resolving every
    /// record individually rather than failing the batch outright.
    pub async fn resolve_batch(&self, records: &[TransformedRecord], now: DateTime<Utc>) -> Vec<Result<ResolvedKeys, EtlError>> {
        match self.resolve_batch_bulk(records, now).await {
            Ok(keys) => keys.into_iter().map(Ok).collect(),
            Err(err) => {
                warn!(error = %err, batch_len = records.len(), "bulk dimension resolution failed, falling back to per-record resolution");
                let mut results = Vec::with_capacity(records.len());
                for record in records {
                    results.push(self.resolve(record, now).await);
                }
                results
            }
        }
    }

    async fn resolve_batch_bulk(&self, records: &[TransformedRecord], now: DateTime<Utc>) -> Result<Vec<ResolvedKeys>, EtlError> {
        let customer_keys = self.resolve_customers_bulk(records, now).await?;
        let product_keys = self.resolve_products_bulk(records, now).await?;
        let date_keys = self.resolve_dates_bulk(records).await?;

        let mut resolved = Vec::with_capacity(records.len());
        for record in records {
            let customer_key = *customer_keys
                .get(record.customer_id.as_str())
                .ok_or_else(|| EtlError::Internal(format!("customer {} missing from bulk resolution", record.customer_id.as_str())))?;
            let product_key = *product_keys
                .get(record.stock_code.as_str())
                .ok_or_else(|| EtlError::Internal(format!("product {} missing from bulk resolution", record.stock_code.as_str())))?;
            let date_key = DateKey::from_date(record.transaction_date);
            let date_surrogate_key = *date_keys
                .get(&date_key.value())
                .ok_or_else(|| EtlError::Internal(format!("date {} missing from bulk resolution", date_key.value())))?;
            resolved.push(ResolvedKeys { customer_key, product_key, date_key, date_surrogate_key });
        }
        Ok(resolved)
    }

    /// Folds every record's country into the last value seen per
    /// `customer_id` (spec §9 open question 5: overwrite on change),
    /// bulk-looks-up existing keys, then bulk-upserts whatever wasn't
    /// found.
    async fn resolve_customers_bulk(&self, records: &[TransformedRecord], now: DateTime<Utc>) -> Result<HashMap<String, i64>, EtlError> {
        let mut by_id: HashMap<String, String> = HashMap::new();
        for record in records {
            by_id.insert(record.customer_id.as_str().to_string(), record.country.as_str().to_string());
        }
        let ids: Vec<String> = by_id.keys().cloned().collect();

        let mut keys = self.customers.find_keys_by_customer_ids(&ids).await?;

        let missing: Vec<DimCustomer> = by_id
            .iter()
            .filter(|(id, _)| !keys.contains_key(*id))
            .map(|(id, country)| DimCustomer::new(id.clone(), country.clone(), now))
            .collect();
        if !missing.is_empty() {
            let new_keys = self.customers.upsert_batch(&missing).await?;
            keys.extend(new_keys);
        }

        let mut cache = self.cache.lock().await;
        let mut countries = self.customer_countries.lock().await;
        for (id, key) in &keys {
            cache.put_customer_key(id, *key);
        }
        for (id, country) in by_id {
            countries.insert(id, country);
        }
        Ok(keys)
    }

    /// Folds every record sharing a `stock_code` via `merge_attributes`
    /// (longest description, first non-empty category/subcategory,
    /// OR-merged `is_gift`), merges that against the repository's
    /// current row when one exists, then bulk-upserts every distinct
    /// product so the merged attributes are always persisted.
    async fn resolve_products_bulk(&self, records: &[TransformedRecord], now: DateTime<Utc>) -> Result<HashMap<String, i64>, EtlError> {
        let mut merged: HashMap<String, DimProduct> = HashMap::new();
        for record in records {
            let code = record.stock_code.as_str();
            match merged.get_mut(code) {
                Some(existing) => existing.merge_attributes(&record.description, &record.category, &record.subcategory, record.is_gift),
                None => {
                    merged.insert(
                        code.to_string(),
                        DimProduct::new(code, &record.description, &record.category, &record.subcategory, record.is_gift, &self.data_source, now),
                    );
                }
            }
        }

        let codes: Vec<String> = merged.keys().cloned().collect();
        let existing = self.products.find_by_stock_codes(&codes).await?;

        let mut to_upsert = Vec::with_capacity(merged.len());
        for (code, incoming) in merged {
            let mut dim = match existing.get(&code) {
                Some(current) => {
                    let mut current = current.clone();
                    current.merge_attributes(&incoming.description, &incoming.category, &incoming.subcategory, incoming.is_gift);
                    current
                }
                None => incoming,
            };
            dim.updated_at = now;
            to_upsert.push(dim);
        }

        let keys = self.products.upsert_batch(&to_upsert).await?;

        let mut cache = self.cache.lock().await;
        let mut attrs = self.product_attrs.lock().await;
        for (code, key) in &keys {
            cache.put_product_key(code, *key);
        }
        for dim in to_upsert {
            attrs.insert(dim.stock_code.clone(), dim);
        }
        Ok(keys)
    }

    async fn resolve_dates_bulk(&self, records: &[TransformedRecord]) -> Result<HashMap<i32, i64>, EtlError> {
        let mut distinct: HashMap<i32, NaiveDate> = HashMap::new();
        for record in records {
            distinct.insert(DateKey::from_date(record.transaction_date).value(), record.transaction_date);
        }
        let date_keys: Vec<i32> = distinct.keys().copied().collect();

        let mut keys = self.dates.find_keys_by_date_keys(&date_keys).await?;

        let missing: Vec<DimDate> = distinct
            .iter()
            .filter(|(key, _)| !keys.contains_key(*key))
            .map(|(_, date)| DimDate::from_date(*date))
            .collect();
        if !missing.is_empty() {
            let new_keys = self.dates.upsert_batch(&missing).await?;
            keys.extend(new_keys);
        }

        let mut cache = self.cache.lock().await;
        for (key, surrogate) in &keys {
            cache.put_date_key(*key, *surrogate);
        }
        Ok(keys)
    }

    /// Per-record fallback, used when `resolve_batch_bulk` itself
    /// errors. A cache hit still checks the incoming record's
    /// attributes against the last-known ones and re-upserts on a
    /// change, so the merge stays reachable even off the bulk path.
    pub async fn resolve(&self, record: &TransformedRecord, now: DateTime<Utc>) -> Result<ResolvedKeys, EtlError> {
        let customer_key = self.resolve_customer(record.customer_id.as_str(), record.country.as_str(), now).await?;
        let product_key = self
            .resolve_product(
                record.stock_code.as_str(),
                &record.description,
                &record.category,
                &record.subcategory,
                record.is_gift,
                now,
            )
            .await?;
        let (date_key, date_surrogate_key) = self.resolve_date(record.transaction_date).await?;

        Ok(ResolvedKeys { customer_key, product_key, date_key, date_surrogate_key })
    }

    async fn resolve_customer(&self, customer_id: &str, country: &str, now: DateTime<Utc>) -> Result<i64, EtlError> {
        if let Some(key) = self.cache.lock().await.get_customer_key(customer_id) {
            let changed = {
                let mut countries = self.customer_countries.lock().await;
                match countries.get(customer_id) {
                    Some(known) if known == country => false,
                    _ => {
                        countries.insert(customer_id.to_string(), country.to_string());
                        true
                    }
                }
            };
            if !changed {
                return Ok(key);
            }
            let mut dim = DimCustomer::new(customer_id, country, now);
            dim.customer_key = Some(key);
            let key = self.customers.upsert(&dim).await?;
            debug!(customer_id, "country changed on cache hit, customer dimension row updated");
            return Ok(key);
        }

        if let Some(key) = self.customers.find_key_by_customer_id(customer_id).await? {
            self.cache.lock().await.put_customer_key(customer_id, key);
            self.customer_countries.lock().await.insert(customer_id.to_string(), country.to_string());
            return Ok(key);
        }
        let dim = DimCustomer::new(customer_id, country, now);
        let key = self.customers.upsert(&dim).await?;
        debug!(customer_id, customer_key = key, "resolved new customer dimension row");
        self.cache.lock().await.put_customer_key(customer_id, key);
        self.customer_countries.lock().await.insert(customer_id.to_string(), country.to_string());
        Ok(key)
    }

    #[allow(clippy::too_many_arguments)]
    async fn resolve_product(
        &self,
        stock_code: &str,
        description: &str,
        category: &str,
        subcategory: &str,
        is_gift: bool,
        now: DateTime<Utc>,
    ) -> Result<i64, EtlError> {
        if let Some(key) = self.cache.lock().await.get_product_key(stock_code) {
            let changed = {
                let mut attrs = self.product_attrs.lock().await;
                match attrs.get_mut(stock_code) {
                    Some(known) => {
                        let before = (known.description.clone(), known.category.clone(), known.subcategory.clone(), known.is_gift);
                        known.merge_attributes(description, category, subcategory, is_gift);
                        let after = (known.description.clone(), known.category.clone(), known.subcategory.clone(), known.is_gift);
                        if before != after {
                            known.updated_at = now;
                            Some(known.clone())
                        } else {
                            None
                        }
                    }
                    None => None,
                }
            };
            if let Some(dim) = changed {
                let key = self.products.upsert(&dim).await?;
                debug!(stock_code, "attributes changed on cache hit, product dimension row updated");
                return Ok(key);
            }
            return Ok(key);
        }

        let mut dim = match self.products.find_by_stock_code(stock_code).await? {
            Some(mut existing) => {
                existing.merge_attributes(description, category, subcategory, is_gift);
                existing.updated_at = now;
                existing
            }
            None => DimProduct::new(stock_code, description, category, subcategory, is_gift, &self.data_source, now),
        };
        dim.updated_at = now;

        let key = self.products.upsert(&dim).await?;
        debug!(stock_code, product_key = key, "resolved product dimension row");
        self.cache.lock().await.put_product_key(stock_code, key);
        self.product_attrs.lock().await.insert(stock_code.to_string(), dim);
        Ok(key)
    }

    async fn resolve_date(&self, date: NaiveDate) -> Result<(DateKey, i64), EtlError> {
        let date_key = DateKey::from_date(date);
        if let Some(key) = self.cache.lock().await.get_date_key(date_key.value()) {
            return Ok((date_key, key));
        }
        if let Some(key) = self.dates.find_key_by_date_key(date_key.value()).await? {
            self.cache.lock().await.put_date_key(date_key.value(), key);
            return Ok((date_key, key));
        }
        let dim = DimDate::from_date(date);
        let key = self.dates.upsert(&dim).await?;
        self.cache.lock().await.put_date_key(date_key.value(), key);
        Ok((date_key, key))
    }
}
