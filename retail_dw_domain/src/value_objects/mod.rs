//! Value objects: immutable, validated wrappers around the primitive
//! fields that flow through the cleaning/transform/classification stages.

pub mod country;
pub mod customer_id;
pub mod date_key;
pub mod ids;
pub mod invoice_number;
pub mod money;
pub mod quantity;
pub mod stock_code;
pub mod version_number;

pub use country::Country;
pub use customer_id::CustomerId;
pub use date_key::DateKey;
pub use ids::{BatchId, JobId, VersionId};
pub use invoice_number::InvoiceNumber;
pub use money::Money;
pub use quantity::Quantity;
pub use stock_code::StockCode;
pub use version_number::VersionNumber;
