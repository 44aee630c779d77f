//! Typed archive facade over an object store backend.

use crate::{
    CONTENT_ENCODING_GZIP, CONTENT_TYPE_JSON, Object, ObjectStore, StorageError, StorageResult,
    gunzip, gzip,
};
use alloy::primitives::B256;
use blob_archiver_types::{BackfillProcesses, BlobData, Lockfile, root_key};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Well-known key of the persisted backfill-process registry.
pub const BACKFILL_PROCESSES_KEY: &str = "backfill_processes";

/// Well-known key of the persisted lockfile.
pub const LOCKFILE_KEY: &str = "lockfile";

/// Typed facade over an [`ObjectStore`].
///
/// Maps the archiver's persisted documents onto object keys: sidecar objects
/// under the hex-encoded block root, the backfill-process registry under
/// [`BACKFILL_PROCESSES_KEY`], and the lockfile under [`LOCKFILE_KEY`].
///
/// # Compression
///
/// When constructed with `compress`, sidecar objects are gzip-compressed on
/// write and tagged with `Content-Encoding: gzip`; reads decompress exactly
/// when the backend reports that encoding. The small checkpoint documents are
/// always stored plain.
///
/// # Backfill registry locking
///
/// All read-modify-write sequences on the backfill-process registry must run
/// under the guard returned by [`lock_backfill`](Self::lock_backfill), which
/// serializes them within the process. Cross-process mutations are governed
/// by the lockfile lease, not by this mutex.
#[derive(Debug, Clone)]
pub struct ArchiveStore<S> {
    store: S,
    compress: bool,
    backfill_mu: Arc<Mutex<()>>,
}

impl<S: ObjectStore> ArchiveStore<S> {
    /// Create a new archive store over the given backend.
    pub fn new(store: S, compress: bool) -> Self {
        Self { store, compress, backfill_mu: Arc::new(Mutex::new(())) }
    }

    /// Get a reference to the underlying backend.
    pub const fn backend(&self) -> &S {
        &self.store
    }

    /// Acquire the process-wide backfill registry lock.
    ///
    /// Hold the guard across the full read-modify-write of the registry.
    pub async fn lock_backfill(&self) -> MutexGuard<'_, ()> {
        self.backfill_mu.lock().await
    }

    /// Check whether sidecars for the given block root are stored.
    pub async fn sidecar_exists(&self, root: &B256) -> StorageResult<bool> {
        self.store.exists(&root_key(root)).await
    }

    /// Read the stored sidecars for the given block root.
    pub async fn read_sidecars(&self, root: &B256) -> StorageResult<BlobData> {
        let object = self.store.get_object(&root_key(root)).await?;
        let bytes = Self::decode_body(object)?;
        serde_json::from_slice(&bytes).map_err(StorageError::marshal)
    }

    /// Write a block's sidecars, replacing any existing object under the key.
    pub async fn write_sidecars(&self, data: &BlobData) -> StorageResult<()> {
        let key = root_key(&data.header.beacon_block_hash);
        let body = serde_json::to_vec(data).map_err(StorageError::marshal)?;

        let (body, encoding) = if self.compress {
            (gzip(&body)?, Some(CONTENT_ENCODING_GZIP))
        } else {
            (body, None)
        };

        self.store.put_object(&key, Bytes::from(body), CONTENT_TYPE_JSON, encoding).await?;

        debug!(hash = %key, "wrote blob");
        Ok(())
    }

    /// Read the backfill-process registry, bootstrapping an empty document on
    /// a fresh store.
    pub async fn read_backfill_processes(&self) -> StorageResult<BackfillProcesses> {
        match self.read_document(BACKFILL_PROCESSES_KEY).await {
            Err(StorageError::NotFound(_)) => {
                debug!("creating empty backfill_processes object");
                let empty = BackfillProcesses::default();
                self.write_backfill_processes(&empty).await?;
                Ok(empty)
            }
            other => other,
        }
    }

    /// Persist the backfill-process registry.
    pub async fn write_backfill_processes(
        &self,
        processes: &BackfillProcesses,
    ) -> StorageResult<()> {
        self.write_document(BACKFILL_PROCESSES_KEY, processes).await
    }

    /// Read the lockfile, bootstrapping a zero-value document on a fresh
    /// store.
    pub async fn read_lockfile(&self) -> StorageResult<Lockfile> {
        match self.read_document(LOCKFILE_KEY).await {
            Err(StorageError::NotFound(_)) => {
                debug!("creating empty lockfile object");
                let empty = Lockfile::default();
                self.write_lockfile(&empty).await?;
                Ok(empty)
            }
            other => other,
        }
    }

    /// Persist the lockfile.
    pub async fn write_lockfile(&self, lockfile: &Lockfile) -> StorageResult<()> {
        self.write_document(LOCKFILE_KEY, lockfile).await
    }

    async fn read_document<T: serde::de::DeserializeOwned>(&self, key: &str) -> StorageResult<T> {
        let object = self.store.get_object(key).await?;
        let bytes = Self::decode_body(object)?;
        serde_json::from_slice(&bytes).map_err(StorageError::marshal)
    }

    async fn write_document<T: serde::Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let body = serde_json::to_vec(value).map_err(StorageError::marshal)?;
        self.store.put_object(key, Bytes::from(body), CONTENT_TYPE_JSON, None).await
    }

    fn decode_body(object: Object) -> StorageResult<Bytes> {
        if object.is_gzip() {
            Ok(Bytes::from(gunzip(&object.bytes)?))
        } else {
            Ok(object.bytes)
        }
    }
}
