//! Enum holding whichever object store backend was configured.

use blob_archiver_store::{Object, ObjectStore, StorageResult};
use blob_archiver_store_file::FileStore;
use blob_archiver_store_s3::S3Store;
use bytes::Bytes;

/// Enum to hold either object store backend type.
///
/// Dispatches [`ObjectStore`] to the inner backend, letting the services
/// stay monomorphic over a single store type chosen at startup.
#[derive(Debug, Clone)]
pub enum EitherStore {
    /// S3-compatible backend.
    S3(S3Store),
    /// Local-directory backend.
    File(FileStore),
}

impl ObjectStore for EitherStore {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self {
            Self::S3(store) => store.exists(key).await,
            Self::File(store) => store.exists(key).await,
        }
    }

    async fn get_object(&self, key: &str) -> StorageResult<Object> {
        match self {
            Self::S3(store) => store.get_object(key).await,
            Self::File(store) => store.get_object(key).await,
        }
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        content_encoding: Option<&str>,
    ) -> StorageResult<()> {
        match self {
            Self::S3(store) => store.put_object(key, bytes, content_type, content_encoding).await,
            Self::File(store) => store.put_object(key, bytes, content_type, content_encoding).await,
        }
    }
}
