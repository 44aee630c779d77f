//! Types used by the blob archiver crates.
//!
//! These are the consensus-layer records the archiver ingests and serves
//! (blob sidecars, beacon block headers) together with the documents it
//! persists in the object store (stored blobs, the backfill-process registry,
//! the lockfile).
//!
//! # Encodings
//!
//! Every type carries the consensus-style JSON encoding (`0x`-prefixed hex
//! for byte fields, string-quoted integers). [`BlobSidecar`] additionally
//! carries SSZ via derive, and [`BlobSidecars`] encodes as the plain
//! concatenation of its fixed-size elements.
//!
//! # Feature Flags
//!
//! - **`test-utils`**: enables the [`blobtest`] fixture module used across
//!   the workspace's tests.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod sidecar;
pub use sidecar::{
    BLOB_SIDECAR_SIZE, BeaconBlockHeader, Blob, BlobSidecar, InclusionProof, KzgCommitment,
    KzgProof, SignedBeaconBlockHeader,
};

mod sidecars;
pub use sidecars::BlobSidecars;

mod header;
pub use header::BlockHeaderData;

mod stored;
pub use stored::{BlobData, StoredHeader};

mod backfill;
pub use backfill::{BackfillProcess, BackfillProcesses};

mod lockfile;
pub use lockfile::Lockfile;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod blobtest;

/// Format a beacon block root the way it is used as a storage key: lowercase
/// hex with a `0x` prefix.
pub fn root_key(root: &alloy::primitives::B256) -> String {
    format!("{root:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;

    #[test]
    fn root_key_is_prefixed_lowercase_hex() {
        let root = B256::repeat_byte(0xAB);
        let key = root_key(&root);
        assert!(key.starts_with("0x"));
        assert_eq!(key.len(), 66);
        assert_eq!(key, key.to_lowercase());
    }
}
