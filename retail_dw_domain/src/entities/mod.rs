//! Entities: the mutable, identity-bearing records that move through the
//! pipeline and land in the warehouse.

pub mod cleaned_record;
pub mod data_lineage;
pub mod data_version;
pub mod dim_customer;
pub mod dim_date;
pub mod dim_product;
pub mod fact_row;
pub mod quality_metric;
pub mod raw_record;
pub mod transformed_record;

pub use cleaned_record::CleanedRecord;
pub use data_lineage::{DataLineage, Metadata};
pub use data_version::DataVersion;
pub use dim_customer::DimCustomer;
pub use dim_date::DimDate;
pub use dim_product::DimProduct;
pub use fact_row::FactRow;
pub use quality_metric::QualityMetric;
pub use raw_record::RawRecord;
pub use transformed_record::TransformedRecord;
