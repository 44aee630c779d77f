//! HTTP-level tests of the archiver admin API.

use blob_archiver_archiver::{Archiver, ArchiverOptions, admin_router};
use blob_archiver_beacon::stub::StubBeaconSource;
use blob_archiver_store::{ArchiveStore, mem::MemStore};
use blob_archiver_types::blobtest;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

async fn serve() -> (String, ArchiveStore<MemStore>, CancellationToken) {
    let store = ArchiveStore::new(MemStore::new(), false);
    let beacon = StubBeaconSource::with_default_chain();
    let cancel = CancellationToken::new();
    let archiver = Arc::new(Archiver::new(
        store.clone(),
        beacon,
        ArchiverOptions::new(blobtest::ORIGIN_BLOCK),
        cancel.clone(),
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let router = admin_router(archiver);
    let server_cancel = cancel.clone();
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(server_cancel.cancelled_owned())
            .await
            .unwrap();
    });

    (base, store, cancel)
}

#[tokio::test]
async fn healthz_responds() {
    let (base, _store, cancel) = serve().await;

    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(response.status(), 200);

    cancel.cancel();
}

#[tokio::test]
async fn rearchive_stores_the_requested_range() {
    let (base, store, cancel) = serve().await;

    let from = blobtest::START_SLOT + 1;
    let to = blobtest::START_SLOT + 4;
    let response = reqwest::Client::new()
        .post(format!("{base}/rearchive?from={from}&to={to}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["blockStart"], from);
    assert_eq!(body["blockEnd"], to);
    assert!(body.get("error").is_none());

    for root in [blobtest::ONE, blobtest::TWO, blobtest::THREE, blobtest::FOUR] {
        assert!(store.sidecar_exists(&root).await.unwrap());
    }

    cancel.cancel();
}

#[tokio::test]
async fn rearchive_validates_params() {
    let (base, _store, cancel) = serve().await;
    let client = reqwest::Client::new();

    for (query, expected) in [
        ("?to=14", "invalid from param: must provide param"),
        ("?from=11", "invalid to param: must provide param"),
        ("?from=abc&to=14", "invalid from param: invalid slot: \"abc\""),
        ("?from=11&to=-4", "invalid to param: invalid slot: \"-4\""),
        ("?from=14&to=11", "invalid range: from 14 to 11"),
    ] {
        let response =
            client.post(format!("{base}/rearchive{query}")).send().await.unwrap();
        assert_eq!(response.status(), 400, "query {query}");

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], expected, "query {query}");
    }

    cancel.cancel();
}
