//! Repository traits: ports the application layer implements against
//! Postgres (spec §4.5-§4.10). The domain depends only on these
//! contracts, never on `sqlx` directly.

pub mod dimension_repository;
pub mod fact_repository;
pub mod lineage_repository;
pub mod partition_repository;
pub mod quality_repository;
pub mod schema_repository;
pub mod version_repository;

pub use dimension_repository::{CustomerDimensionRepository, DateDimensionRepository, ProductDimensionRepository};
pub use fact_repository::FactRepository;
pub use lineage_repository::LineageRepository;
pub use partition_repository::PartitionRepository;
pub use quality_repository::QualityRepository;
pub use schema_repository::SchemaRepository;
pub use version_repository::VersionRepository;
