//! HTTP-level tests of the read API, exercising the full id × indices ×
//! accept × gzip matrix.

use alloy::primitives::B256;
use blob_archiver_api::{HttpError, api_router};
use blob_archiver_beacon::stub::StubBeaconSource;
use blob_archiver_store::{ArchiveStore, gunzip, mem::MemStore};
use blob_archiver_types::{BlobData, BlobSidecars, blobtest};
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

const ROOT_ONE: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
const ROOT_TWO: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890222222";

struct Fixture {
    base: String,
    block_one: BlobSidecars,
    block_two: BlobSidecars,
    cancel: CancellationToken,
}

async fn serve() -> Fixture {
    let store = ArchiveStore::new(MemStore::new(), false);
    let beacon = StubBeaconSource::new();

    let root_one = B256::from_str(ROOT_ONE).unwrap();
    let root_two = B256::from_str(ROOT_TWO).unwrap();

    let block_one = blobtest::new_blob_sidecars(2);
    let block_two = blobtest::new_blob_sidecars(2);
    store.write_sidecars(&BlobData::new(root_one, block_one.clone())).await.unwrap();
    store.write_sidecars(&BlobData::new(root_two, block_two.clone())).await.unwrap();

    beacon.set_header("finalized", blobtest::header(1233, root_one, B256::ZERO));
    beacon.set_header("head", blobtest::header(1234, root_two, root_one));
    beacon.set_header("1234", blobtest::header(1234, root_two, root_one));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let cancel = CancellationToken::new();
    let router = api_router(store, beacon);
    let server_cancel = cancel.clone();
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(server_cancel.cancelled_owned())
            .await
            .unwrap();
    });

    Fixture { base, block_one, block_two, cancel }
}

struct Case {
    name: &'static str,
    path: String,
    status: u16,
    expected: Option<BlobSidecars>,
    err_message: &'static str,
}

fn subset(block: &BlobSidecars, indices: &[usize]) -> BlobSidecars {
    BlobSidecars::new(indices.iter().map(|&i| block.data[i].clone()).collect())
}

#[tokio::test]
async fn blob_sidecars_endpoint_matrix() {
    let fixture = serve().await;
    let client = reqwest::Client::new();

    let cases = vec![
        Case {
            name: "fetch root one",
            path: format!("/eth/v1/beacon/blob_sidecars/{ROOT_ONE}"),
            status: 200,
            expected: Some(fixture.block_one.clone()),
            err_message: "",
        },
        Case {
            name: "fetch root two",
            path: format!("/eth/v1/beacon/blob_sidecars/{ROOT_TWO}"),
            status: 200,
            expected: Some(fixture.block_two.clone()),
            err_message: "",
        },
        Case {
            name: "fetch unknown root",
            path: "/eth/v1/beacon/blob_sidecars/0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abc111".to_owned(),
            status: 404,
            expected: None,
            err_message: "Block not found",
        },
        Case {
            name: "fetch head",
            path: "/eth/v1/beacon/blob_sidecars/head".to_owned(),
            status: 200,
            expected: Some(fixture.block_two.clone()),
            err_message: "",
        },
        Case {
            name: "fetch finalized",
            path: "/eth/v1/beacon/blob_sidecars/finalized".to_owned(),
            status: 200,
            expected: Some(fixture.block_one.clone()),
            err_message: "",
        },
        Case {
            name: "fetch slot",
            path: "/eth/v1/beacon/blob_sidecars/1234".to_owned(),
            status: 200,
            expected: Some(fixture.block_two.clone()),
            err_message: "",
        },
        Case {
            name: "fetch unknown slot",
            path: "/eth/v1/beacon/blob_sidecars/5555".to_owned(),
            status: 404,
            expected: None,
            err_message: "Block not found",
        },
        Case {
            name: "indices only returns requested indices",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=1".to_owned(),
            status: 200,
            expected: Some(subset(&fixture.block_two, &[1])),
            err_message: "",
        },
        Case {
            name: "deduplicates indices",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=1,1,1".to_owned(),
            status: 200,
            expected: Some(subset(&fixture.block_two, &[1])),
            err_message: "",
        },
        Case {
            name: "multi indices",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=0&indices=1".to_owned(),
            status: 200,
            expected: Some(fixture.block_two.clone()),
            err_message: "",
        },
        Case {
            name: "multi indices comma separated list",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=0,1".to_owned(),
            status: 200,
            expected: Some(fixture.block_two.clone()),
            err_message: "",
        },
        Case {
            name: "only index out of bounds returns error",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=3".to_owned(),
            status: 400,
            expected: None,
            err_message: "invalid index: 3 block contains 2 blobs",
        },
        Case {
            name: "any index out of bounds returns error",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=1,10".to_owned(),
            status: 400,
            expected: None,
            err_message: "invalid index: 10 block contains 2 blobs",
        },
        Case {
            name: "boundary index out of bounds returns error",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=2".to_owned(),
            status: 400,
            expected: None,
            err_message: "invalid index: 2 block contains 2 blobs",
        },
        Case {
            name: "negative index returns error",
            path: "/eth/v1/beacon/blob_sidecars/1234?indices=-2".to_owned(),
            status: 400,
            expected: None,
            err_message: "invalid index input: -2",
        },
        Case {
            name: "no 0x on hash",
            path: format!("/eth/v1/beacon/blob_sidecars/{}", &ROOT_ONE[2..]),
            status: 400,
            expected: None,
            err_message:
                "invalid block id: 1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
        },
        Case {
            name: "invalid hash",
            path: "/eth/v1/beacon/blob_sidecars/0x1234567890abcdef123".to_owned(),
            status: 400,
            expected: None,
            err_message: "invalid block id: 0x1234567890abcdef123",
        },
        Case {
            name: "invalid named identifier",
            path: "/eth/v1/beacon/blob_sidecars/foobar".to_owned(),
            status: 400,
            expected: None,
            err_message: "invalid block id: foobar",
        },
        Case {
            name: "no parameter specified",
            path: "/eth/v1/beacon/blob_sidecars/".to_owned(),
            status: 404,
            expected: None,
            err_message: "",
        },
        Case {
            name: "unknown route",
            path: "/eth/v1/".to_owned(),
            status: 404,
            expected: None,
            err_message: "",
        },
    ];

    for case in &cases {
        for accept in ["application/json", "application/octet-stream"] {
            for compress in [false, true] {
                let mut request = client
                    .get(format!("{}{}", fixture.base, case.path))
                    .header("Accept", accept);
                if compress {
                    request = request.header("Accept-Encoding", "gzip");
                }

                let response = request.send().await.unwrap();
                let context = format!("{} ({accept}, gzip={compress})", case.name);
                assert_eq!(response.status().as_u16(), case.status, "{context}");

                let gzipped = response
                    .headers()
                    .get("content-encoding")
                    .is_some_and(|v| v == "gzip");
                let mut body = response.bytes().await.unwrap().to_vec();
                if gzipped {
                    body = gunzip(&body).unwrap();
                }

                if case.status == 200 {
                    let expected = case.expected.as_ref().unwrap();
                    assert_eq!(gzipped, compress, "{context}");

                    let actual = if accept == "application/octet-stream" {
                        BlobSidecars::from_ssz_bytes(&body).unwrap()
                    } else {
                        serde_json::from_slice(&body).unwrap()
                    };
                    assert_eq!(&actual, expected, "{context}");
                } else if !case.err_message.is_empty() {
                    // Errors are always JSON, whatever the accept header.
                    let err: HttpError = serde_json::from_slice(&body).unwrap();
                    assert_eq!(err.code, case.status, "{context}");
                    assert_eq!(err.message, case.err_message, "{context}");
                }
            }
        }
    }

    fixture.cancel.cancel();
}

#[tokio::test]
async fn version_endpoint() {
    let fixture = serve().await;

    let response =
        reqwest::get(format!("{}/eth/v1/node/version", fixture.base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["version"], "Blob Archiver API/unknown");

    fixture.cancel.cancel();
}

#[tokio::test]
async fn healthz_endpoint() {
    let fixture = serve().await;

    let response = reqwest::get(format!("{}/healthz", fixture.base)).await.unwrap();
    assert_eq!(response.status(), 200);

    fixture.cancel.cancel();
}
