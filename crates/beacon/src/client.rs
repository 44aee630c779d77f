//! HTTP beacon node client.

use crate::{BeaconError, BeaconResult, BeaconSource, BlockId};
use alloy::primitives::B256;
use blob_archiver_types::{BlobSidecar, BlobSidecars, BlockHeaderData};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default timeout for beacon node requests.
pub const DEFAULT_BEACON_TIMEOUT: Duration = Duration::from_secs(10);

const SSZ_ACCEPT_TYPE: &str = "application/octet-stream";

/// Configuration for the HTTP beacon client.
#[derive(Debug, Clone)]
pub struct BeaconClientConfig {
    /// Base URL of the beacon node, e.g. `http://localhost:5052`.
    pub beacon_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Fetch sidecars as JSON instead of SSZ.
    pub enforce_json: bool,
}

impl BeaconClientConfig {
    /// Create a config with the default timeout and SSZ sidecar fetches.
    pub fn new(beacon_url: impl Into<String>) -> Self {
        Self { beacon_url: beacon_url.into(), timeout: DEFAULT_BEACON_TIMEOUT, enforce_json: false }
    }
}

/// Envelope of a `headers/{id}` response.
#[derive(Debug, Deserialize)]
struct HeaderResponse {
    data: BlockHeaderData,
}

/// Envelope of a JSON `blob_sidecars/{id}` response.
#[derive(Debug, Deserialize)]
struct SidecarsResponse {
    data: Vec<BlobSidecar>,
}

/// HTTP implementation of [`BeaconSource`].
///
/// Headers are always fetched as JSON. Sidecars are fetched as SSZ (decoded
/// with the fixed-size list codec) unless `enforce_json` is set.
#[derive(Debug, Clone)]
pub struct HttpBeaconSource {
    client: reqwest::Client,
    base_url: String,
    enforce_json: bool,
}

impl HttpBeaconSource {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(cfg: BeaconClientConfig) -> BeaconResult<Self> {
        let client = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self {
            client,
            base_url: cfg.beacon_url.trim_end_matches('/').to_owned(),
            enforce_json: cfg.enforce_json,
        })
    }

    async fn get(&self, path: &str, accept: &str) -> BeaconResult<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "beacon request");
        let response = self.client.get(&url).header("Accept", accept).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(BeaconError::NotFound(path.to_owned()))
        } else if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(BeaconError::Transient(format!("status {status} for {path}")))
        } else {
            Err(BeaconError::Status { status: status.as_u16() })
        }
    }
}

impl BeaconSource for HttpBeaconSource {
    async fn header_by_id(&self, id: &BlockId) -> BeaconResult<BlockHeaderData> {
        let response = self
            .get(&format!("/eth/v1/beacon/headers/{id}"), "application/json")
            .await?;
        let envelope: HeaderResponse = response.json().await.map_err(BeaconError::decode)?;
        Ok(envelope.data)
    }

    async fn sidecars_by_root(&self, root: B256) -> BeaconResult<Vec<BlobSidecar>> {
        let path = format!("/eth/v1/beacon/blob_sidecars/{root:#x}");

        if self.enforce_json {
            let response = self.get(&path, "application/json").await?;
            let envelope: SidecarsResponse = response.json().await.map_err(BeaconError::decode)?;
            Ok(envelope.data)
        } else {
            let response = self.get(&path, SSZ_ACCEPT_TYPE).await?;
            let bytes = response.bytes().await?;
            let sidecars = BlobSidecars::from_ssz_bytes(&bytes)
                .map_err(|e| BeaconError::decode(format!("{e:?}")))?;
            Ok(sidecars.data)
        }
    }
}
