//! Conformance tests for [`ObjectStore`] backends.
//!
//! These tests verify that a backend implementation behaves correctly
//! according to the [`ObjectStore`] trait contract. To use them with a
//! custom backend, call [`conformance`] with your backend instance.

use crate::{
    ArchiveStore, CONTENT_ENCODING_GZIP, CONTENT_TYPE_JSON, ObjectStore, StorageResult, gzip,
};
use blob_archiver_types::{BlobData, blobtest};
use bytes::Bytes;

/// Run all conformance tests against a backend.
pub async fn conformance<S: ObjectStore + Clone>(backend: &S) -> StorageResult<()> {
    test_missing_key(backend).await?;
    test_put_get_round_trip(backend).await?;
    test_overwrite(backend).await?;
    test_content_encoding_round_trip(backend).await?;
    test_archive_facade(backend).await?;
    Ok(())
}

/// Absent keys are reported as not-found, not as backend errors.
pub async fn test_missing_key<S: ObjectStore>(backend: &S) -> StorageResult<()> {
    assert!(!backend.exists("conformance/absent").await?);
    let err = backend.get_object("conformance/absent").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {err}");
    Ok(())
}

/// Written bytes read back identically.
pub async fn test_put_get_round_trip<S: ObjectStore>(backend: &S) -> StorageResult<()> {
    let body = Bytes::from_static(b"{\"data\":[]}");
    backend.put_object("conformance/object", body.clone(), CONTENT_TYPE_JSON, None).await?;

    assert!(backend.exists("conformance/object").await?);
    let object = backend.get_object("conformance/object").await?;
    assert_eq!(object.bytes, body);
    assert!(!object.is_gzip());
    Ok(())
}

/// A second put under the same key replaces the object.
pub async fn test_overwrite<S: ObjectStore>(backend: &S) -> StorageResult<()> {
    let first = Bytes::from_static(b"first");
    let second = Bytes::from_static(b"second");

    backend.put_object("conformance/overwrite", first, CONTENT_TYPE_JSON, None).await?;
    backend.put_object("conformance/overwrite", second.clone(), CONTENT_TYPE_JSON, None).await?;

    assert_eq!(backend.get_object("conformance/overwrite").await?.bytes, second);
    Ok(())
}

/// The recorded content encoding survives the round trip.
pub async fn test_content_encoding_round_trip<S: ObjectStore>(backend: &S) -> StorageResult<()> {
    let body = gzip(b"compressed payload")?;
    backend
        .put_object(
            "conformance/gzip",
            Bytes::from(body.clone()),
            CONTENT_TYPE_JSON,
            Some(CONTENT_ENCODING_GZIP),
        )
        .await?;

    let object = backend.get_object("conformance/gzip").await?;
    assert!(object.is_gzip());
    assert_eq!(object.bytes, Bytes::from(body));
    Ok(())
}

/// The typed facade round-trips sidecars through the backend, compressed and
/// plain.
pub async fn test_archive_facade<S: ObjectStore + Clone>(backend: &S) -> StorageResult<()> {
    for compress in [false, true] {
        let archive = ArchiveStore::new(backend.clone(), compress);
        let data = BlobData::new(blobtest::FOUR, blobtest::new_blob_sidecars(2));

        archive.write_sidecars(&data).await?;
        assert!(archive.sidecar_exists(&blobtest::FOUR).await?);
        assert_eq!(archive.read_sidecars(&blobtest::FOUR).await?, data);
    }
    Ok(())
}
