//! The header envelope consumed from the beacon node.

use crate::SignedBeaconBlockHeader;
use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

/// The `data` portion of a beacon `headers/{id}` response.
///
/// This is the slice of the upstream envelope the archiver actually uses:
/// the block root plus the signed header carrying `slot` and `parent_root`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeaderData {
    /// The root of the block.
    pub root: B256,
    /// The signed block header.
    pub header: SignedBeaconBlockHeader,
}

impl BlockHeaderData {
    /// The slot of the block.
    pub const fn slot(&self) -> u64 {
        self.header.message.slot
    }

    /// The root of the parent block.
    pub const fn parent_root(&self) -> B256 {
        self.header.message.parent_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BeaconBlockHeader;

    #[test]
    fn accessors_read_through_to_the_message() {
        let header = BlockHeaderData {
            root: B256::repeat_byte(1),
            header: SignedBeaconBlockHeader {
                message: BeaconBlockHeader {
                    slot: 7,
                    parent_root: B256::repeat_byte(2),
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        assert_eq!(header.slot(), 7);
        assert_eq!(header.parent_root(), B256::repeat_byte(2));
    }
}
