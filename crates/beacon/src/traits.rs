//! Core trait definition for beacon node access.

use crate::{BeaconResult, BlockId};
use alloy::primitives::B256;
use blob_archiver_types::{BlobSidecar, BlockHeaderData};
use std::future::Future;

/// The two beacon node operations the archiver consumes.
///
/// Implementations must distinguish an unknown block
/// ([`BeaconError::NotFound`](crate::BeaconError::NotFound)) from transport
/// faults: the archiver's walks stop on the former and retry the latter.
pub trait BeaconSource: Send + Sync + 'static {
    /// Fetch the header for the given block identifier.
    fn header_by_id(
        &self,
        id: &BlockId,
    ) -> impl Future<Output = BeaconResult<BlockHeaderData>> + Send;

    /// Fetch the ordered blob sidecars for the given block root.
    ///
    /// A block without blobs yields an empty list.
    fn sidecars_by_root(
        &self,
        root: B256,
    ) -> impl Future<Output = BeaconResult<Vec<BlobSidecar>>> + Send;
}
