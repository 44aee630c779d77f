//! Admin HTTP surface of the archiver.

use crate::{Archiver, RearchiveReport};
use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use blob_archiver_beacon::BeaconSource;
use blob_archiver_store::ObjectStore;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc, time::Duration};

const SERVER_TIMEOUT: Duration = Duration::from_secs(60);

/// Response body of `POST /rearchive`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RearchiveResponse {
    /// The error that stopped the range, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    /// First slot of the range.
    #[serde(rename = "blockStart")]
    pub(crate) block_start: u64,
    /// Last slot completed.
    #[serde(rename = "blockEnd")]
    pub(crate) block_end: u64,
}

impl From<RearchiveReport> for RearchiveResponse {
    fn from(report: RearchiveReport) -> Self {
        Self { error: report.error, block_start: report.block_start, block_end: report.block_end }
    }
}

/// Build the admin router: `POST /rearchive` and `GET /healthz`.
pub fn admin_router<S, B>(archiver: Arc<Archiver<S, B>>) -> Router
where
    S: ObjectStore,
    B: BeaconSource,
{
    Router::new()
        .route("/healthz", get(healthz))
        .route("/rearchive", post(rearchive::<S, B>))
        .layer(middleware::from_fn(with_timeout))
        .with_state(archiver)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

fn to_slot(params: &HashMap<String, String>, name: &str) -> Result<u64, String> {
    let value = params.get(name).ok_or_else(|| "must provide param".to_owned())?;
    value.parse::<u64>().map_err(|_| format!("invalid slot: \"{value}\""))
}

/// Rearchive blobs for blocks between the given `from` and `to` slots,
/// overwriting anything already stored in the range.
async fn rearchive<S, B>(
    State(archiver): State<Arc<Archiver<S, B>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response
where
    S: ObjectStore,
    B: BeaconSource,
{
    let from = match to_slot(&params, "from") {
        Ok(from) => from,
        Err(err) => return bad_request(format!("invalid from param: {err}")),
    };
    let to = match to_slot(&params, "to") {
        Ok(to) => to,
        Err(err) => return bad_request(format!("invalid to param: {err}")),
    };
    if from > to {
        return bad_request(format!("invalid range: from {from} to {to}"));
    }

    let report = archiver.rearchive_range(from, to).await;
    let status = if report.error.is_some() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (status, Json(RearchiveResponse::from(report))).into_response()
}

fn bad_request(error: String) -> Response {
    let body = RearchiveResponse { error: Some(error), block_start: 0, block_end: 0 };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Abort request handling after [`SERVER_TIMEOUT`], replying with an empty
/// response.
async fn with_timeout(request: Request, next: Next) -> Response {
    match tokio::time::timeout(SERVER_TIMEOUT, next.run(request)).await {
        Ok(response) => response,
        Err(_) => StatusCode::GATEWAY_TIMEOUT.into_response(),
    }
}
