//! # Identifiers
//!
//! Newtype wrappers around `Uuid`/surrogate integer keys so call sites
//! can't accidentally pass a `BatchId` where a `VersionId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }

            /// Wraps a `Uuid` read back from storage.
            pub fn from_uuid(id: Uuid) -> Self {
                $name(id)
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(JobId);
uuid_id!(BatchId);

/// Surrogate key assigned by `data_versions.version_id` (SERIAL). `None`
/// until the row has been inserted and the key read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionId(i64);

impl VersionId {
    pub fn new(value: i64) -> Self {
        VersionId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
