//! The persisted blob object.

use crate::BlobSidecars;
use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

/// Header of a stored blob object.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHeader {
    /// The root of the beacon block the sidecars belong to.
    pub beacon_block_hash: B256,
}

/// The unit persisted in the object store: one block's sidecars, keyed by the
/// block root.
///
/// Immutable once written; only an explicit rearchive replaces an existing
/// object.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobData {
    /// The storage header.
    pub header: StoredHeader,
    /// The block's sidecars.
    pub blob_sidecars: BlobSidecars,
}

impl BlobData {
    /// Create a new stored blob for the given block root.
    pub const fn new(beacon_block_hash: B256, blob_sidecars: BlobSidecars) -> Self {
        Self { header: StoredHeader { beacon_block_hash }, blob_sidecars }
    }

    /// The beacon block root this object is keyed by.
    pub const fn beacon_block_hash(&self) -> B256 {
        self.header.beacon_block_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobtest;

    #[test]
    fn json_shape_matches_the_stored_object_format() {
        let data = BlobData::new(B256::repeat_byte(5), blobtest::new_blob_sidecars(1));
        let json = serde_json::to_value(&data).unwrap();

        assert!(json["header"]["beacon_block_hash"].as_str().unwrap().starts_with("0x"));
        assert!(json["blob_sidecars"]["data"].is_array());

        let decoded: BlobData = serde_json::from_value(json).unwrap();
        assert_eq!(data, decoded);
    }
}
