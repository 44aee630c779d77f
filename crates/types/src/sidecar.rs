//! The blob sidecar record and its beacon block header envelope.
//!
//! Field set and sizes follow the Deneb consensus spec. The archiver treats
//! these as opaque data: no KZG verification is performed anywhere in the
//! workspace.

use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    FixedVector,
    typenum::{U17, U48, U96, U131072},
};

use alloy::primitives::B256;

/// SSZ-encoded size of a single [`BlobSidecar`] in bytes.
///
/// Every field is fixed-size, so the whole record is too:
/// 8 + 131072 + 48 + 48 + 208 + 17 * 32.
pub const BLOB_SIDECAR_SIZE: usize = 131928;

/// A 131072-byte blob payload.
pub type Blob = FixedVector<u8, U131072>;

/// A 48-byte KZG commitment.
pub type KzgCommitment = FixedVector<u8, U48>;

/// A 48-byte KZG proof.
pub type KzgProof = FixedVector<u8, U48>;

/// The 17-element Merkle branch proving commitment inclusion in the block
/// body.
pub type InclusionProof = FixedVector<B256, U17>;

/// A beacon block header message.
///
/// Only `slot` and `parent_root` are consumed by the archiver; the remaining
/// fields are carried so persisted headers round-trip byte-for-byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct BeaconBlockHeader {
    /// The slot the block was proposed in.
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    /// The index of the proposing validator.
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    /// The root of the parent block.
    pub parent_root: B256,
    /// The root of the post-state.
    pub state_root: B256,
    /// The root of the block body.
    pub body_root: B256,
}

/// A beacon block header with the proposer's signature.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SignedBeaconBlockHeader {
    /// The header message.
    pub message: BeaconBlockHeader,
    /// The proposer's BLS signature over the message.
    #[serde(with = "ssz_types::serde_utils::hex_fixed_vec")]
    pub signature: FixedVector<u8, U96>,
}

/// An EIP-4844 blob sidecar as gossiped and served by beacon nodes.
///
/// Identity is `(block_root, index)`; the block root is carried out-of-band
/// by [`crate::BlobData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct BlobSidecar {
    /// Index of this sidecar within the block's blob list.
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    /// The blob payload.
    #[serde(with = "ssz_types::serde_utils::hex_fixed_vec")]
    pub blob: Blob,
    /// Commitment to the blob polynomial.
    #[serde(with = "ssz_types::serde_utils::hex_fixed_vec")]
    pub kzg_commitment: KzgCommitment,
    /// Proof for the commitment.
    #[serde(with = "ssz_types::serde_utils::hex_fixed_vec")]
    pub kzg_proof: KzgProof,
    /// The signed header of the block this sidecar belongs to.
    pub signed_block_header: SignedBeaconBlockHeader,
    /// Merkle branch proving the commitment's inclusion in the block body.
    pub kzg_commitment_inclusion_proof: InclusionProof,
}

impl Default for BlobSidecar {
    fn default() -> Self {
        Self {
            index: 0,
            blob: Blob::default(),
            kzg_commitment: KzgCommitment::default(),
            kzg_proof: KzgProof::default(),
            signed_block_header: SignedBeaconBlockHeader::default(),
            kzg_commitment_inclusion_proof: InclusionProof::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz::{Decode, Encode};

    #[test]
    fn sidecar_ssz_size_is_fixed() {
        assert_eq!(<BlobSidecar as Encode>::ssz_fixed_len(), BLOB_SIDECAR_SIZE);
        assert_eq!(BlobSidecar::default().as_ssz_bytes().len(), BLOB_SIDECAR_SIZE);
    }

    #[test]
    fn sidecar_ssz_round_trip() {
        let sidecar = crate::blobtest::new_blob_sidecar(3);
        let bytes = sidecar.as_ssz_bytes();
        let decoded = BlobSidecar::from_ssz_bytes(&bytes).unwrap();
        assert_eq!(sidecar, decoded);
    }

    #[test]
    fn sidecar_json_uses_consensus_encoding() {
        let sidecar = crate::blobtest::new_blob_sidecar(7);
        let json = serde_json::to_value(&sidecar).unwrap();
        assert_eq!(json["index"], "7");
        let blob = json["blob"].as_str().unwrap();
        assert!(blob.starts_with("0x"));
        assert_eq!(blob.len(), 2 + 131072 * 2);

        let decoded: BlobSidecar = serde_json::from_value(json).unwrap();
        assert_eq!(sidecar, decoded);
    }

    #[test]
    fn header_json_quotes_slot() {
        let header = BeaconBlockHeader { slot: 42, ..Default::default() };
        let json = serde_json::to_value(header).unwrap();
        assert_eq!(json["slot"], "42");
    }
}
