//! Core trait definition for object store backends.
//!
//! The [`ObjectStore`] trait is the interface all backends implement. Keys
//! are flat strings; callers compose paths. Backends are responsible only for
//! durable byte storage; all typing, keying conventions and compression live
//! in the [`ArchiveStore`](crate::ArchiveStore) facade.

use crate::StorageResult;
use bytes::Bytes;
use std::future::Future;

/// Content type of the JSON documents the archiver persists.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content encoding reported for gzip-compressed objects.
pub const CONTENT_ENCODING_GZIP: &str = "gzip";

/// An object read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// The raw object bytes as stored.
    pub bytes: Bytes,
    /// The content encoding recorded for the object, if any.
    pub content_encoding: Option<String>,
}

impl Object {
    /// Create a new object.
    pub const fn new(bytes: Bytes, content_encoding: Option<String>) -> Self {
        Self { bytes, content_encoding }
    }

    /// Whether the object is recorded as gzip-encoded.
    pub fn is_gzip(&self) -> bool {
        self.content_encoding.as_deref() == Some(CONTENT_ENCODING_GZIP)
    }
}

/// Unified object store backend trait.
///
/// All methods are async and return futures that are `Send`.
///
/// # Implementation Guide
///
/// Implementers must ensure:
///
/// - **Distinguished not-found**: `get_object` for an absent key returns
///   [`StorageError::NotFound`](crate::StorageError::NotFound), never a
///   generic backend error. `exists` returns `Ok(false)` for an absent key.
///
/// - **Commit-or-fail writes**: a `put_object` that returns `Ok` must leave
///   the full object visible to readers; a failed put must not leave a
///   half-written object observable under the key.
///
/// - **Encoding fidelity**: the `content_encoding` passed to `put_object`
///   must be reported back by `get_object` so readers know whether to
///   decompress.
pub trait ObjectStore: Send + Sync + 'static {
    /// Check whether an object exists under the given key.
    fn exists(&self, key: &str) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Read the object stored under the given key.
    fn get_object(&self, key: &str) -> impl Future<Output = StorageResult<Object>> + Send;

    /// Write an object under the given key, replacing any existing object.
    fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        content_encoding: Option<&str>,
    ) -> impl Future<Output = StorageResult<()>> + Send;
}
