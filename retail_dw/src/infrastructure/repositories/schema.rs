//! # Schema repository (Postgres)
//!
//! DDL for the `retail_dw` schema (spec §3, §6 `setup [--drop-existing]`),
//! grounded in the teacher's `infrastructure::repositories::schema`
//! pattern of a dedicated module owning database bootstrapping, adapted
//! from SQLite migrations to raw Postgres DDL since this warehouse's
//! range partitioning and partial unique indexes need database-specific
//! syntax `sqlx::migrate!` doesn't express any more plainly than inline
//! SQL.

use async_trait::async_trait;
use retail_dw_domain::repositories::SchemaRepository;
use retail_dw_domain::EtlError;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::infrastructure::error::from_sqlx;

const DROP_SCHEMA: &str = "DROP SCHEMA IF EXISTS retail_dw CASCADE";

const CREATE_SCHEMA: &str = r#"
CREATE SCHEMA IF NOT EXISTS retail_dw;

CREATE TABLE IF NOT EXISTS retail_dw.dim_date (
    date_key INTEGER PRIMARY KEY,
    full_date DATE NOT NULL UNIQUE,
    year INTEGER NOT NULL,
    quarter INTEGER NOT NULL,
    month INTEGER NOT NULL,
    week INTEGER NOT NULL,
    day_of_year INTEGER NOT NULL,
    day_of_month INTEGER NOT NULL,
    day_of_week INTEGER NOT NULL,
    month_name TEXT NOT NULL,
    day_name TEXT NOT NULL,
    quarter_name TEXT NOT NULL,
    is_weekend BOOLEAN NOT NULL,
    is_holiday BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE IF NOT EXISTS retail_dw.dim_customer (
    customer_key BIGSERIAL PRIMARY KEY,
    customer_id TEXT NOT NULL,
    country TEXT NOT NULL,
    effective_date TIMESTAMPTZ NOT NULL,
    expiry_date TIMESTAMPTZ,
    is_current BOOLEAN NOT NULL DEFAULT TRUE
);

CREATE UNIQUE INDEX IF NOT EXISTS dim_customer_current_idx
    ON retail_dw.dim_customer (customer_id)
    WHERE is_current;

CREATE TABLE IF NOT EXISTS retail_dw.dim_product (
    product_key BIGSERIAL PRIMARY KEY,
    stock_code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    is_gift BOOLEAN NOT NULL DEFAULT FALSE,
    data_source TEXT NOT NULL DEFAULT 'CSV',
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS retail_dw.data_versions (
    version_id BIGSERIAL PRIMARY KEY,
    version_number TEXT NOT NULL UNIQUE,
    version_type TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    source_file TEXT,
    file_hash TEXT,
    records_count BIGINT NOT NULL DEFAULT 0,
    etl_job_id TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    -- Terminal run outcome (SUCCESS/FAILED/PARTIAL/CANCELLED), distinct
    -- from `status` which only ever tracks ACTIVE/ARCHIVED (spec §9 open
    -- question 4). Null until the run finalizes.
    run_status TEXT
);

CREATE TABLE IF NOT EXISTS retail_dw.data_lineage (
    lineage_id BIGSERIAL PRIMARY KEY,
    source_system TEXT NOT NULL,
    source_table TEXT,
    source_file TEXT,
    target_table TEXT NOT NULL,
    batch_id UUID NOT NULL,
    records_processed BIGINT NOT NULL DEFAULT 0,
    records_inserted BIGINT NOT NULL DEFAULT 0,
    records_updated BIGINT NOT NULL DEFAULT 0,
    records_rejected BIGINT NOT NULL DEFAULT 0,
    started_at TIMESTAMPTZ NOT NULL,
    completed_at TIMESTAMPTZ,
    status TEXT NOT NULL DEFAULT 'RUNNING',
    job_metadata JSONB NOT NULL DEFAULT '{}'::jsonb
);

CREATE TABLE IF NOT EXISTS retail_dw.data_quality_metrics (
    metric_id BIGSERIAL PRIMARY KEY,
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    metric_name TEXT NOT NULL,
    metric_value DOUBLE PRECISION NOT NULL,
    threshold_value DOUBLE PRECISION,
    is_threshold_met BOOLEAN,
    batch_id UUID NOT NULL,
    measured_at TIMESTAMPTZ NOT NULL,
    details JSONB NOT NULL DEFAULT '{}'::jsonb
);

CREATE INDEX IF NOT EXISTS data_quality_metrics_history_idx
    ON retail_dw.data_quality_metrics (table_name, metric_name, measured_at DESC);

-- fact_sales is range-partitioned on transaction_datetime (spec §3, §4.7);
-- the partition key must be part of every unique/primary key, hence the
-- composite (sales_key, transaction_datetime) primary key (spec §9 open
-- question 1).
CREATE TABLE IF NOT EXISTS retail_dw.fact_sales (
    sales_key BIGSERIAL NOT NULL,
    customer_key BIGINT NOT NULL REFERENCES retail_dw.dim_customer (customer_key),
    product_key BIGINT NOT NULL REFERENCES retail_dw.dim_product (product_key),
    date_key INTEGER NOT NULL REFERENCES retail_dw.dim_date (date_key),
    invoice_no BIGINT NOT NULL,
    transaction_type TEXT NOT NULL,
    quantity BIGINT NOT NULL,
    unit_price NUMERIC(12, 2) NOT NULL,
    line_total NUMERIC(14, 2) NOT NULL,
    transaction_datetime TIMESTAMP NOT NULL,
    batch_id UUID NOT NULL,
    version_id BIGINT REFERENCES retail_dw.data_versions (version_id),
    data_source TEXT NOT NULL DEFAULT 'CSV',
    PRIMARY KEY (sales_key, transaction_datetime),
    CONSTRAINT fact_sales_quantity_non_negative CHECK (quantity >= 0),
    CONSTRAINT fact_sales_unit_price_non_negative CHECK (unit_price >= 0),
    CONSTRAINT fact_sales_line_total_non_negative CHECK (line_total >= 0),
    -- round() tolerates the NUMERIC(14,2) scale; Transformer already
    -- computes line_total = quantity * unit_price (spec §9 open
    -- question 2: enabled).
    CONSTRAINT fact_sales_line_total_matches_price CHECK (line_total = round(quantity * unit_price, 2))
) PARTITION BY RANGE (transaction_datetime);

-- Monthly partitions are created on demand by PartitionRepository as
-- data arrives; no default partition so a row with a date outside every
-- ensured partition fails loudly instead of landing in a catch-all.
"#;

pub struct PgSchemaRepository {
    pool: PgPool,
}

impl PgSchemaRepository {
    pub fn new(pool: PgPool) -> Self {
        PgSchemaRepository { pool }
    }
}

#[async_trait]
impl SchemaRepository for PgSchemaRepository {
    async fn apply(&self, drop_existing: bool) -> Result<(), EtlError> {
        if drop_existing {
            warn!("dropping retail_dw schema before recreating it");
            sqlx::query(DROP_SCHEMA).execute(&self.pool).await.map_err(from_sqlx)?;
        }
        sqlx::raw_sql(CREATE_SCHEMA).execute(&self.pool).await.map_err(from_sqlx)?;
        info!("retail_dw schema applied");
        Ok(())
    }

    async fn ping(&self) -> Result<(), EtlError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(from_sqlx)?;
        Ok(())
    }
}
