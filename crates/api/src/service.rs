//! Router, handlers and lifecycle of the read API.

use crate::{
    HttpError, MetricsConfig,
    metrics::{self, BlockIdType, metrics_router},
    version_string,
};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use blob_archiver_beacon::{BeaconError, BeaconSource, BlockId};
use blob_archiver_store::{ArchiveStore, ObjectStore, StorageError, gzip};
use blob_archiver_types::{BlobSidecar, BlobSidecars};
use serde::Serialize;
use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const SSZ_ACCEPT_TYPE: &str = "application/octet-stream";
const SERVER_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared state of the read handlers.
struct ApiState<S, B> {
    store: ArchiveStore<S>,
    beacon: B,
}

impl<S: Clone, B: Clone> Clone for ApiState<S, B> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), beacon: self.beacon.clone() }
    }
}

/// Build the read API router.
pub fn api_router<S, B>(store: ArchiveStore<S>, beacon: B) -> Router
where
    S: ObjectStore + Clone,
    B: BeaconSource + Clone,
{
    Router::new()
        .route("/eth/v1/beacon/blob_sidecars/{id}", get(blob_sidecars::<S, B>))
        .route("/eth/v1/node/version", get(version))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn(with_timeout))
        .with_state(ApiState { store, beacon })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
struct VersionData {
    version: String,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    data: VersionData,
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { data: VersionData { version: version_string() } })
}

/// Resolve a path identifier to the canonical beacon block root.
///
/// Literal roots pass through; slots and named identifiers are resolved via
/// the beacon node.
async fn resolve_block_id<B: BeaconSource>(
    beacon: &B,
    input: &str,
) -> Result<alloy::primitives::B256, HttpError> {
    let id: BlockId = match input.parse() {
        Ok(id) => id,
        Err(_) => {
            metrics::record_block_id_type(BlockIdType::Invalid);
            return Err(HttpError::invalid_block_id(input));
        }
    };

    if let BlockId::Root(root) = id {
        metrics::record_block_id_type(BlockIdType::Hash);
        return Ok(root);
    }

    metrics::record_block_id_type(BlockIdType::Beacon);
    match beacon.header_by_id(&id).await {
        Ok(header) => Ok(header.root),
        Err(BeaconError::NotFound(_)) => Err(HttpError::unknown_block()),
        Err(err) => {
            error!(%err, id = input, "failed to resolve block id");
            Err(HttpError::server_error())
        }
    }
}

/// Filter the sidecars by the requested indices.
///
/// Index parameters may be repeated, comma-separated or both. Duplicates
/// collapse; the response stays in ascending index order. An unparsable
/// element or an index past the blob count rejects the whole request.
fn filter_blobs(
    blobs: Vec<BlobSidecar>,
    params: &[(String, String)],
) -> Result<Vec<BlobSidecar>, HttpError> {
    let mut requested = Vec::new();
    for (key, value) in params {
        if key != "indices" || value.is_empty() {
            continue;
        }
        for raw in value.split(',') {
            let index: u64 =
                raw.parse().map_err(|_| HttpError::invalid_index_input(raw))?;
            requested.push(index);
        }
    }

    if requested.is_empty() {
        return Ok(blobs);
    }

    for &index in &requested {
        if index >= blobs.len() as u64 {
            return Err(HttpError::invalid_index(index, blobs.len()));
        }
    }

    let indices: BTreeSet<u64> = requested.into_iter().collect();
    Ok(blobs.into_iter().filter(|blob| indices.contains(&blob.index)).collect())
}

async fn blob_sidecars<S, B>(
    State(state): State<ApiState<S, B>>,
    Path(id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response
where
    S: ObjectStore + Clone,
    B: BeaconSource + Clone,
{
    let root = match resolve_block_id(&state.beacon, &id).await {
        Ok(root) => root,
        Err(err) => return err.into_response(),
    };

    let data = match state.store.read_sidecars(&root).await {
        Ok(data) => data,
        Err(StorageError::NotFound(_)) => return HttpError::unknown_block().into_response(),
        Err(err) => {
            error!(%err, hash = %root, param = id, "unexpected error fetching blobs");
            return HttpError::server_error().into_response();
        }
    };

    let filtered = match filter_blobs(data.blob_sidecars.data, &params) {
        Ok(filtered) => filtered,
        Err(err) => return err.into_response(),
    };
    let sidecars = BlobSidecars::new(filtered);

    let accept =
        headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()).unwrap_or_default();
    let (body, content_type) = if accept == SSZ_ACCEPT_TYPE {
        (sidecars.to_ssz_bytes(), SSZ_ACCEPT_TYPE)
    } else {
        match serde_json::to_vec(&sidecars) {
            Ok(body) => (body, "application/json"),
            Err(err) => {
                error!(%err, "unable to encode blob sidecars");
                return HttpError::server_error().into_response();
            }
        }
    };

    let accepts_gzip = headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("gzip"));

    let mut response = Response::builder().header(header::CONTENT_TYPE, content_type);
    let body = if accepts_gzip {
        match gzip(&body) {
            Ok(compressed) => {
                response = response.header(header::CONTENT_ENCODING, "gzip");
                compressed
            }
            Err(err) => {
                error!(%err, "unable to compress response");
                return HttpError::server_error().into_response();
            }
        }
    } else {
        body
    };

    match response.body(Body::from(body)) {
        Ok(response) => response,
        Err(err) => {
            error!(%err, "unable to build response");
            HttpError::server_error().into_response()
        }
    }
}

/// Abort request handling after [`SERVER_TIMEOUT`], replying with an empty
/// response.
async fn with_timeout(request: Request, next: Next) -> Response {
    match tokio::time::timeout(SERVER_TIMEOUT, next.run(request)).await {
        Ok(response) => response,
        Err(_) => StatusCode::GATEWAY_TIMEOUT.into_response(),
    }
}

/// The read API service: the blob sidecar endpoint plus an optional metrics
/// server.
///
/// Stop is idempotent; the second call reports it.
#[derive(Debug)]
pub struct ApiService<S, B> {
    store: ArchiveStore<S>,
    beacon: B,
    listen_addr: String,
    metrics: MetricsConfig,
    cancel: CancellationToken,
    stopped: AtomicBool,
}

/// Error returned when stop is called twice.
#[derive(Debug, thiserror::Error)]
#[error("already stopped")]
pub struct AlreadyStopped;

impl<S, B> ApiService<S, B>
where
    S: ObjectStore + Clone + std::fmt::Debug,
    B: BeaconSource + Clone + std::fmt::Debug,
{
    /// Create a new service.
    pub const fn new(
        store: ArchiveStore<S>,
        beacon: B,
        listen_addr: String,
        metrics: MetricsConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self { store, beacon, listen_addr, metrics, cancel, stopped: AtomicBool::new(false) }
    }

    /// Serve the API until cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be bound.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        if self.metrics.enabled {
            let addr = format!("{}:{}", self.metrics.listen_addr, self.metrics.listen_port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!(address = %listener.local_addr()?, "metrics server started");

            let cancel = self.cancel.clone();
            tokio::spawn(async move {
                if let Err(err) = axum::serve(listener, metrics_router())
                    .with_graceful_shutdown(cancel.cancelled_owned())
                    .await
                {
                    error!(%err, "metrics server terminated");
                }
            });
        }

        let listener = tokio::net::TcpListener::bind(&self.listen_addr).await?;
        info!(address = %listener.local_addr()?, "blob archiver API server started");

        let router = api_router(self.store.clone(), self.beacon.clone());
        axum::serve(listener, router)
            .with_graceful_shutdown(self.cancel.clone().cancelled_owned())
            .await
    }

    /// Stop the service.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyStopped`] on the second call.
    pub fn stop(&self) -> Result<(), AlreadyStopped> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(AlreadyStopped);
        }
        info!("stopping blob archiver API");
        self.cancel.cancel();
        Ok(())
    }

    /// Whether stop has been called.
    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blob_archiver_types::blobtest;

    fn sidecars(count: u64) -> Vec<BlobSidecar> {
        blobtest::new_blob_sidecars(count).data
    }

    fn indices(values: &[&str]) -> Vec<(String, String)> {
        values.iter().map(|v| ("indices".to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn no_indices_returns_everything() {
        let blobs = sidecars(3);
        let filtered = filter_blobs(blobs.clone(), &[]).unwrap();
        assert_eq!(filtered, blobs);

        // An empty indices value is treated as absent.
        let filtered = filter_blobs(blobs.clone(), &indices(&[""])).unwrap();
        assert_eq!(filtered, blobs);
    }

    #[test]
    fn repeated_and_comma_separated_mix() {
        let blobs = sidecars(4);
        let params = vec![
            ("indices".to_owned(), "0,2".to_owned()),
            ("indices".to_owned(), "3".to_owned()),
        ];
        let filtered = filter_blobs(blobs, &params).unwrap();
        assert_eq!(filtered.iter().map(|b| b.index).collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn duplicates_collapse_in_ascending_order() {
        let blobs = sidecars(4);
        let filtered = filter_blobs(blobs, &indices(&["3,1,3,1"])).unwrap();
        assert_eq!(filtered.iter().map(|b| b.index).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn unparsable_index_is_rejected() {
        let err = filter_blobs(sidecars(2), &indices(&["-2"])).unwrap_err();
        assert_eq!(err.message, "invalid index input: -2");

        let err = filter_blobs(sidecars(2), &indices(&["1,x"])).unwrap_err();
        assert_eq!(err.message, "invalid index input: x");
    }

    #[test]
    fn out_of_bounds_index_is_rejected() {
        let err = filter_blobs(sidecars(2), &indices(&["2"])).unwrap_err();
        assert_eq!(err.message, "invalid index: 2 block contains 2 blobs");

        // The first offending index in request order is reported.
        let err = filter_blobs(sidecars(2), &indices(&["1,10"])).unwrap_err();
        assert_eq!(err.message, "invalid index: 10 block contains 2 blobs");
    }
}
