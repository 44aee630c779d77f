//! Error types for the archival engine.

use blob_archiver_beacon::BeaconError;
use blob_archiver_store::StorageError;

/// Result type alias for archiver operations.
pub type ArchiverResult<T, E = ArchiverError> = Result<T, E>;

/// Error type for archiver operations.
#[derive(Debug, thiserror::Error)]
pub enum ArchiverError {
    /// The beacon node request failed.
    #[error(transparent)]
    Beacon(#[from] BeaconError),

    /// The object store operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ArchiverError {
    /// Whether a retry of the failed operation may succeed.
    ///
    /// Transient beacon faults and unspecified storage faults are retried;
    /// not-found and marshal failures short-circuit.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Beacon(BeaconError::Transient(_)) | Self::Storage(StorageError::Backend(_))
        )
    }

    /// Whether the underlying cause is a beacon-side not-found.
    pub const fn is_missing_block(&self) -> bool {
        matches!(self, Self::Beacon(BeaconError::NotFound(_)))
    }
}

/// Error type for the service lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Stop was called on an already-stopped service.
    #[error("already stopped")]
    AlreadyStopped,

    /// The service failed to bind or serve a listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archiver could not be seeded with an initial block.
    #[error("failed to seed archiver with initial block: {0}")]
    Seed(#[source] ArchiverError),
}
