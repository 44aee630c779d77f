//! Prometheus metrics for the read API.

use axum::{Router, http::HeaderValue, response::IntoResponse, routing::get};
use prometheus::{Encoder, TextEncoder};
use std::sync::LazyLock;
use tracing::warn;

/// How a request identified the block it asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockIdType {
    /// A literal block root.
    Hash,
    /// A slot or named identifier resolved via the beacon node.
    Beacon,
    /// An unparsable identifier.
    Invalid,
}

impl BlockIdType {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Beacon => "beacon",
            Self::Invalid => "invalid",
        }
    }
}

/// Count a request by the kind of block identifier it used.
pub fn record_block_id_type(id_type: BlockIdType) {
    static BLOCK_ID_TYPES: LazyLock<prometheus::IntCounterVec> = LazyLock::new(|| {
        prometheus::register_int_counter_vec!(
            "blob_archiver_api_block_id_total",
            "Count of requests by block identifier type",
            &["type"]
        )
        .unwrap()
    });
    BLOCK_ID_TYPES.with_label_values(&[id_type.as_str()]).inc();
}

/// Router serving the default prometheus registry at `/metrics`.
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(serve_metrics))
}

async fn serve_metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buffer) {
        warn!(%err, "failed to gather prometheus metrics");
    }

    let mut response = buffer.into_response();
    response.headers_mut().insert(
        "content-type",
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    response
}
