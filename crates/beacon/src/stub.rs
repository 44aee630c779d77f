//! In-memory beacon source for testing.

use crate::{BeaconError, BeaconResult, BeaconSource, BlockId};
use alloy::primitives::B256;
use blob_archiver_types::{BlobSidecar, BlockHeaderData, blobtest};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

#[derive(Debug, Default)]
struct StubInner {
    /// Headers keyed by the identifier string they are served under.
    headers: HashMap<String, BlockHeaderData>,
    /// Sidecars keyed by the hex block root.
    blobs: HashMap<String, Vec<BlobSidecar>>,
}

/// Map-backed [`BeaconSource`] for tests.
///
/// Cheaply cloneable; clones share state, so tests can reshape the chain
/// (e.g. move `head`) while the archiver holds its own handle.
#[derive(Debug, Clone, Default)]
pub struct StubBeaconSource {
    inner: Arc<RwLock<StubInner>>,
}

impl StubBeaconSource {
    /// Create an empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stub serving the default six-block fixture chain
    /// `ORIGIN_BLOCK <- ONE <- TWO <- THREE <- FOUR <- FIVE`, with `head` at
    /// `FIVE` and `finalized` at `THREE`, addressable by root, slot and name.
    pub fn with_default_chain() -> Self {
        let stub = Self::new();

        let chain = [
            // (slot, root, parent)
            (blobtest::START_SLOT, blobtest::ORIGIN_BLOCK, B256::repeat_byte(0x99)),
            (blobtest::START_SLOT + 1, blobtest::ONE, blobtest::ORIGIN_BLOCK),
            (blobtest::START_SLOT + 2, blobtest::TWO, blobtest::ONE),
            (blobtest::START_SLOT + 3, blobtest::THREE, blobtest::TWO),
            (blobtest::START_SLOT + 4, blobtest::FOUR, blobtest::THREE),
            (blobtest::START_SLOT + 5, blobtest::FIVE, blobtest::FOUR),
        ];
        let blob_counts = [1, 2, 0, 4, 5, 6];

        for ((slot, root, parent), count) in chain.into_iter().zip(blob_counts) {
            let header = blobtest::header(slot, root, parent);
            stub.set_header(&BlockId::Root(root).to_string(), header.clone());
            stub.set_header(&slot.to_string(), header.clone());
            stub.set_blobs(root, blobtest::new_blob_sidecars(count).data);

            if root == blobtest::THREE {
                stub.set_header("finalized", header);
            } else if root == blobtest::FIVE {
                stub.set_header("head", header);
            }
        }

        stub
    }

    /// Serve the given header under an identifier string.
    pub fn set_header(&self, id: &str, header: BlockHeaderData) {
        self.inner.write().unwrap().headers.insert(id.to_owned(), header);
    }

    /// Look up a header by identifier string.
    pub fn header(&self, id: &str) -> Option<BlockHeaderData> {
        self.inner.read().unwrap().headers.get(id).cloned()
    }

    /// Serve the given sidecars for a block root.
    pub fn set_blobs(&self, root: B256, sidecars: Vec<BlobSidecar>) {
        self.inner
            .write()
            .unwrap()
            .blobs
            .insert(BlockId::Root(root).to_string(), sidecars);
    }

    /// Look up the sidecars served for a block root.
    pub fn blobs(&self, root: B256) -> Option<Vec<BlobSidecar>> {
        self.inner.read().unwrap().blobs.get(&BlockId::Root(root).to_string()).cloned()
    }
}

impl BeaconSource for StubBeaconSource {
    async fn header_by_id(&self, id: &BlockId) -> BeaconResult<BlockHeaderData> {
        self.header(&id.to_string())
            .ok_or_else(|| BeaconError::NotFound(id.to_string()))
    }

    async fn sidecars_by_root(&self, root: B256) -> BeaconResult<Vec<BlobSidecar>> {
        self.blobs(root)
            .ok_or_else(|| BeaconError::NotFound(BlockId::Root(root).to_string()))
    }
}
