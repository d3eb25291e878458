//! Pure domain services: the per-record cleaning/transform/
//! classification pipeline (spec §4.1-§4.3) and the quality-rule
//! calculators (spec §4.9).

pub mod classifier;
pub mod cleaner;
pub mod quality_rules;
pub mod transformer;

pub use classifier::Classification;
pub use cleaner::{Cleaner, CleanerConfig, CleaningOutcome, ValidationRule};
pub use quality_rules::{BatchCounters, DimensionBatchCounters, QualityAlert, QualityThresholds};
pub use transformer::Transformer;
