//! In-memory object store backend for testing.

use crate::{Object, ObjectStore, StorageError, StorageResult};
use bytes::Bytes;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemStoreInner {
    objects: HashMap<String, Object>,
    /// Number of upcoming writes that fail with a backend error.
    fail_writes: u32,
}

/// In-memory object store backend.
///
/// Thread-safe and cheaply cloneable; clones share the same state. The
/// [`fail_writes`](Self::fail_writes) knob injects backend failures for
/// retry-path tests.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    inner: Arc<RwLock<MemStoreInner>>,
}

/// Error injected by [`MemStore::fail_writes`].
#[derive(Debug, thiserror::Error)]
#[error("injected write failure")]
pub struct InjectedWriteFailure;

impl MemStore {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail with a backend error.
    pub async fn fail_writes(&self, count: u32) {
        self.inner.write().await.fail_writes = count;
    }

    /// The number of objects currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.objects.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.objects.is_empty()
    }
}

impl ObjectStore for MemStore {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.inner.read().await.objects.contains_key(key))
    }

    async fn get_object(&self, key: &str) -> StorageResult<Object> {
        self.inner
            .read()
            .await
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        _content_type: &str,
        content_encoding: Option<&str>,
    ) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        if inner.fail_writes > 0 {
            inner.fail_writes -= 1;
            return Err(StorageError::backend(InjectedWriteFailure));
        }
        inner
            .objects
            .insert(key.to_owned(), Object::new(bytes, content_encoding.map(str::to_owned)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let store = MemStore::new();
        store.fail_writes(2).await;

        for _ in 0..2 {
            assert!(
                store.put_object("k", Bytes::from_static(b"v"), "text", None).await.is_err()
            );
        }
        store.put_object("k", Bytes::from_static(b"v"), "text", None).await.unwrap();
        assert!(store.exists("k").await.unwrap());
    }
}
