//! Postgres implementations of the domain's repository ports.

pub mod dimension;
pub mod fact;
pub mod lineage;
pub mod partition;
pub mod quality;
pub mod schema;
pub mod version;

pub use dimension::{PgCustomerDimensionRepository, PgDateDimensionRepository, PgProductDimensionRepository};
pub use fact::PgFactRepository;
pub use lineage::PgLineageRepository;
pub use partition::PgPartitionRepository;
pub use quality::PgQualityRepository;
pub use schema::PgSchemaRepository;
pub use version::PgVersionRepository;
