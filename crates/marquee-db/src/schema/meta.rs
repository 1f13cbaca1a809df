//! Store metadata row holding the on-disk schema version.

use super::SchemaVersion;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Single-row version tag for the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredMeta {
    /// Always "schema" - single row.
    #[primary_key]
    pub key: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl StoredMeta {
    /// Primary key of the one metadata row.
    pub const KEY: &'static str = "schema";

    /// Create the row for a version.
    pub fn from_version(version: SchemaVersion) -> Self {
        Self {
            key: Self::KEY.to_string(),
            major: version.major,
            minor: version.minor,
            patch: version.patch,
        }
    }

    /// Convert back to a version tag.
    pub fn to_version(&self) -> SchemaVersion {
        SchemaVersion::new(self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::V3;

    #[test]
    fn test_meta_roundtrip() {
        let meta = StoredMeta::from_version(V3);
        assert_eq!(meta.key, StoredMeta::KEY);
        assert_eq!(meta.to_version(), V3);
    }
}
