//! Conformance tests for the in-memory object store backend.

use blob_archiver_store::{conformance::conformance, mem::MemStore};

#[tokio::test]
async fn mem_backend_conformance() {
    let backend = MemStore::new();
    conformance(&backend).await.unwrap();
}
