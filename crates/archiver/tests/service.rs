//! Lifecycle tests of the archiver service.

use blob_archiver_archiver::{
    Archiver, ArchiverOptions, ArchiverService, MetricsConfig, ServiceError,
};
use blob_archiver_beacon::stub::StubBeaconSource;
use blob_archiver_store::{ArchiveStore, mem::MemStore};
use blob_archiver_types::blobtest;
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

fn service() -> (Arc<ArchiverService<MemStore, StubBeaconSource>>, ArchiveStore<MemStore>) {
    let store = ArchiveStore::new(MemStore::new(), false);
    let beacon = StubBeaconSource::with_default_chain();
    let cancel = CancellationToken::new();
    let archiver = Arc::new(Archiver::new(
        store.clone(),
        beacon,
        ArchiverOptions::new(blobtest::ORIGIN_BLOCK),
        cancel.clone(),
    ));
    let service = Arc::new(ArchiverService::new(
        archiver,
        "127.0.0.1:0".to_owned(),
        MetricsConfig::default(),
        cancel,
    ));
    (service, store)
}

#[tokio::test]
async fn stop_is_idempotent() {
    let (service, _store) = service();

    assert!(!service.stopped());
    service.stop().unwrap();
    assert!(service.stopped());
    assert!(matches!(service.stop(), Err(ServiceError::AlreadyStopped)));
}

#[tokio::test]
async fn start_seeds_and_backfills_to_origin() {
    let (service, store) = service();

    let runner = Arc::clone(&service);
    let handle = tokio::spawn(async move { runner.start().await });

    // The seed stores the head; the backfill fills everything to the origin.
    let all = [
        blobtest::ORIGIN_BLOCK,
        blobtest::ONE,
        blobtest::TWO,
        blobtest::THREE,
        blobtest::FOUR,
        blobtest::FIVE,
    ];
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    'wait: loop {
        assert!(tokio::time::Instant::now() < deadline, "backfill did not complete");
        tokio::time::sleep(Duration::from_millis(10)).await;
        for root in all {
            if !store.sidecar_exists(&root).await.unwrap() {
                continue 'wait;
            }
        }
        break;
    }

    // The lock was claimed by the running instance.
    assert!(!store.read_lockfile().await.unwrap().archiver_id.is_empty());

    service.stop().unwrap();
    handle.await.unwrap().unwrap();
}
