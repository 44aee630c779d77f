//! Deterministic fixtures shared by tests across the workspace.
//!
//! The six-block chain `ORIGIN_BLOCK <- ONE <- ... <- FIVE` at slots
//! `START_SLOT..=START_SLOT + 5` mirrors the default stub beacon chain.

use crate::{
    BeaconBlockHeader, Blob, BlobSidecar, BlobSidecars, BlockHeaderData, KzgCommitment, KzgProof,
    SignedBeaconBlockHeader,
};
use alloy::primitives::B256;
use rand::RngCore;

const fn tagged_root(byte: u8, count: usize) -> B256 {
    let mut bytes = [0u8; 32];
    let mut i = 0;
    while i < count {
        bytes[i] = byte;
        i += 1;
    }
    B256::new(bytes)
}

/// The configured origin block of the fixture chain.
pub const ORIGIN_BLOCK: B256 = tagged_root(9, 5);
/// Fixture block one.
pub const ONE: B256 = tagged_root(1, 1);
/// Fixture block two.
pub const TWO: B256 = tagged_root(2, 1);
/// Fixture block three.
pub const THREE: B256 = tagged_root(3, 1);
/// Fixture block four.
pub const FOUR: B256 = tagged_root(4, 1);
/// Fixture block five.
pub const FIVE: B256 = tagged_root(5, 1);

/// Slot of [`ORIGIN_BLOCK`].
pub const START_SLOT: u64 = 10;
/// Slot of [`FIVE`].
pub const END_SLOT: u64 = 15;

/// Fill a buffer of the given size with random bytes.
pub fn rand_bytes(size: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; size];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Build a header envelope for the fixture chain.
pub fn header(slot: u64, root: B256, parent_root: B256) -> BlockHeaderData {
    BlockHeaderData {
        root,
        header: SignedBeaconBlockHeader {
            message: BeaconBlockHeader { slot, parent_root, ..Default::default() },
            ..Default::default()
        },
    }
}

/// Build a sidecar with the given index and random payloads.
pub fn new_blob_sidecar(index: u64) -> BlobSidecar {
    BlobSidecar {
        index,
        blob: Blob::new(rand_bytes(131072)).unwrap(),
        kzg_commitment: KzgCommitment::new(rand_bytes(48)).unwrap(),
        kzg_proof: KzgProof::new(rand_bytes(48)).unwrap(),
        signed_block_header: SignedBeaconBlockHeader::default(),
        kzg_commitment_inclusion_proof: Default::default(),
    }
}

/// Build `count` sidecars indexed `0..count`.
pub fn new_blob_sidecars(count: u64) -> BlobSidecars {
    BlobSidecars::new((0..count).map(new_blob_sidecar).collect())
}
