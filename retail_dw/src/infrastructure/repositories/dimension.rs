//! # Dimension repositories (Postgres)
//!
//! SCD Type 1 upserts against `dim_customer`, `dim_product`, `dim_date`
//! (spec §4.5, §9). `INSERT ... ON CONFLICT ... RETURNING` gives the
//! upsert-with-returning semantics the spec calls for under concurrent
//! inserts without a separate select-then-insert round trip.

use std::collections::HashMap;

use async_trait::async_trait;
use retail_dw_domain::entities::{DimCustomer, DimDate, DimProduct};
use retail_dw_domain::repositories::{CustomerDimensionRepository, DateDimensionRepository, ProductDimensionRepository};
use retail_dw_domain::EtlError;
use sqlx::PgPool;

use crate::infrastructure::error::from_sqlx;

pub struct PgCustomerDimensionRepository {
    pool: PgPool,
}

impl PgCustomerDimensionRepository {
    pub fn new(pool: PgPool) -> Self {
        PgCustomerDimensionRepository { pool }
    }
}

#[async_trait]
impl CustomerDimensionRepository for PgCustomerDimensionRepository {
    async fn upsert(&self, customer: &DimCustomer) -> Result<i64, EtlError> {
        // Insert-or-ignore on the natural key (spec §4.5): the partial
        // unique index on `(customer_id) WHERE is_current` makes the
        // conflict target explicit.
        let key: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO retail_dw.dim_customer (customer_id, country, effective_date, is_current)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (customer_id) WHERE is_current
            DO UPDATE SET country = EXCLUDED.country
            RETURNING customer_key
            "#,
        )
        .bind(customer.customer_id.as_str())
        .bind(customer.country.as_str())
        .bind(customer.effective_date)
        .fetch_one(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(key)
    }

    async fn find_key_by_customer_id(&self, customer_id: &str) -> Result<Option<i64>, EtlError> {
        sqlx::query_scalar("SELECT customer_key FROM retail_dw.dim_customer WHERE customer_id = $1 AND is_current")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)
    }

    async fn find_keys_by_customer_ids(&self, customer_ids: &[String]) -> Result<HashMap<String, i64>, EtlError> {
        if customer_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT customer_id, customer_key FROM retail_dw.dim_customer WHERE customer_id = ANY($1) AND is_current",
        )
        .bind(customer_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(rows.into_iter().collect())
    }

    async fn upsert_batch(&self, customers: &[DimCustomer]) -> Result<HashMap<String, i64>, EtlError> {
        if customers.is_empty() {
            return Ok(HashMap::new());
        }
        let mut tx = self.pool.begin().await.map_err(from_sqlx)?;
        let mut keys = HashMap::with_capacity(customers.len());
        for customer in customers {
            let key: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO retail_dw.dim_customer (customer_id, country, effective_date, is_current)
                VALUES ($1, $2, $3, TRUE)
                ON CONFLICT (customer_id) WHERE is_current
                DO UPDATE SET country = EXCLUDED.country
                RETURNING customer_key
                "#,
            )
            .bind(customer.customer_id.as_str())
            .bind(customer.country.as_str())
            .bind(customer.effective_date)
            .fetch_one(&mut *tx)
            .await
            .map_err(from_sqlx)?;
            keys.insert(customer.customer_id.clone(), key);
        }
        tx.commit().await.map_err(from_sqlx)?;
        Ok(keys)
    }
}

pub struct PgProductDimensionRepository {
    pool: PgPool,
}

impl PgProductDimensionRepository {
    pub fn new(pool: PgPool) -> Self {
        PgProductDimensionRepository { pool }
    }
}

#[async_trait]
impl ProductDimensionRepository for PgProductDimensionRepository {
    async fn upsert(&self, product: &DimProduct) -> Result<i64, EtlError> {
        let key: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO retail_dw.dim_product
                (stock_code, description, category, subcategory, is_gift, data_source, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (stock_code)
            DO UPDATE SET
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                subcategory = EXCLUDED.subcategory,
                is_gift = EXCLUDED.is_gift,
                updated_at = EXCLUDED.updated_at
            RETURNING product_key
            "#,
        )
        .bind(product.stock_code.as_str())
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.subcategory)
        .bind(product.is_gift)
        .bind(&product.data_source)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(key)
    }

    async fn find_key_by_stock_code(&self, stock_code: &str) -> Result<Option<i64>, EtlError> {
        sqlx::query_scalar("SELECT product_key FROM retail_dw.dim_product WHERE stock_code = $1")
            .bind(stock_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)
    }

    async fn find_by_stock_code(&self, stock_code: &str) -> Result<Option<DimProduct>, EtlError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT product_key, stock_code, description, category, subcategory, is_active, is_gift, data_source, created_at, updated_at \
             FROM retail_dw.dim_product WHERE stock_code = $1",
        )
        .bind(stock_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_stock_codes(&self, stock_codes: &[String]) -> Result<HashMap<String, DimProduct>, EtlError> {
        if stock_codes.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT product_key, stock_code, description, category, subcategory, is_active, is_gift, data_source, created_at, updated_at \
             FROM retail_dw.dim_product WHERE stock_code = ANY($1)",
        )
        .bind(stock_codes)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(rows.into_iter().map(|row| (row.stock_code.clone(), row.into())).collect())
    }

    async fn upsert_batch(&self, products: &[DimProduct]) -> Result<HashMap<String, i64>, EtlError> {
        if products.is_empty() {
            return Ok(HashMap::new());
        }
        let mut tx = self.pool.begin().await.map_err(from_sqlx)?;
        let mut keys = HashMap::with_capacity(products.len());
        for product in products {
            let key: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO retail_dw.dim_product
                    (stock_code, description, category, subcategory, is_gift, data_source, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (stock_code)
                DO UPDATE SET
                    description = EXCLUDED.description,
                    category = EXCLUDED.category,
                    subcategory = EXCLUDED.subcategory,
                    is_gift = EXCLUDED.is_gift,
                    updated_at = EXCLUDED.updated_at
                RETURNING product_key
                "#,
            )
            .bind(product.stock_code.as_str())
            .bind(&product.description)
            .bind(&product.category)
            .bind(&product.subcategory)
            .bind(product.is_gift)
            .bind(&product.data_source)
            .bind(product.created_at)
            .bind(product.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(from_sqlx)?;
            keys.insert(product.stock_code.clone(), key);
        }
        tx.commit().await.map_err(from_sqlx)?;
        Ok(keys)
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_key: i64,
    stock_code: String,
    description: String,
    category: String,
    subcategory: String,
    is_active: bool,
    is_gift: bool,
    data_source: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for DimProduct {
    fn from(row: ProductRow) -> Self {
        DimProduct {
            product_key: Some(row.product_key),
            stock_code: row.stock_code,
            description: row.description,
            category: row.category,
            subcategory: row.subcategory,
            is_active: row.is_active,
            is_gift: row.is_gift,
            data_source: row.data_source,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgDateDimensionRepository {
    pool: PgPool,
}

impl PgDateDimensionRepository {
    pub fn new(pool: PgPool) -> Self {
        PgDateDimensionRepository { pool }
    }
}

#[async_trait]
impl DateDimensionRepository for PgDateDimensionRepository {
    async fn upsert(&self, date: &DimDate) -> Result<i64, EtlError> {
        let key: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO retail_dw.dim_date
                (date_key, full_date, year, quarter, month, week, day_of_year, day_of_month,
                 day_of_week, month_name, day_name, quarter_name, is_weekend, is_holiday)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, FALSE)
            ON CONFLICT (date_key) DO UPDATE SET date_key = EXCLUDED.date_key
            RETURNING date_key
            "#,
        )
        .bind(date.date_key.value())
        .bind(date.full_date)
        .bind(date.year)
        .bind(date.quarter as i32)
        .bind(date.month as i32)
        .bind(date.week as i32)
        .bind(date.day_of_year as i32)
        .bind(date.day_of_month as i32)
        .bind(date.day_of_week as i32)
        .bind(&date.month_name)
        .bind(&date.day_name)
        .bind(&date.quarter_name)
        .bind(date.is_weekend)
        .fetch_one(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(key as i64)
    }

    async fn find_key_by_date_key(&self, date_key: i32) -> Result<Option<i64>, EtlError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT date_key FROM retail_dw.dim_date WHERE date_key = $1")
            .bind(date_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)?;
        Ok(found.map(i64::from))
    }

    async fn find_keys_by_date_keys(&self, date_keys: &[i32]) -> Result<HashMap<i32, i64>, EtlError> {
        if date_keys.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i32,)> = sqlx::query_as("SELECT date_key FROM retail_dw.dim_date WHERE date_key = ANY($1)")
            .bind(date_keys)
            .fetch_all(&self.pool)
            .await
            .map_err(from_sqlx)?;
        Ok(rows.into_iter().map(|(key,)| (key, key as i64)).collect())
    }

    async fn upsert_batch(&self, dates: &[DimDate]) -> Result<HashMap<i32, i64>, EtlError> {
        if dates.is_empty() {
            return Ok(HashMap::new());
        }
        let mut tx = self.pool.begin().await.map_err(from_sqlx)?;
        let mut keys = HashMap::with_capacity(dates.len());
        for date in dates {
            let key: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO retail_dw.dim_date
                    (date_key, full_date, year, quarter, month, week, day_of_year, day_of_month,
                     day_of_week, month_name, day_name, quarter_name, is_weekend, is_holiday)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, FALSE)
                ON CONFLICT (date_key) DO UPDATE SET date_key = EXCLUDED.date_key
                RETURNING date_key
                "#,
            )
            .bind(date.date_key.value())
            .bind(date.full_date)
            .bind(date.year)
            .bind(date.quarter as i32)
            .bind(date.month as i32)
            .bind(date.week as i32)
            .bind(date.day_of_year as i32)
            .bind(date.day_of_month as i32)
            .bind(date.day_of_week as i32)
            .bind(&date.month_name)
            .bind(&date.day_name)
            .bind(&date.quarter_name)
            .bind(date.is_weekend)
            .fetch_one(&mut *tx)
            .await
            .map_err(from_sqlx)?;
            keys.insert(key, key as i64);
        }
        tx.commit().await.map_err(from_sqlx)?;
        Ok(keys)
    }
}
