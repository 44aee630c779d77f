//! Prometheus metrics for the archival engine.

use axum::{Router, http::HeaderValue, response::IntoResponse, routing::get};
use prometheus::{Encoder, TextEncoder};
use std::sync::LazyLock;
use tracing::warn;

/// Where a processed block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    /// The live head follower.
    Live,
    /// A backfill walk.
    Backfill,
    /// An admin-triggered rearchive.
    Rearchive,
}

impl BlockSource {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Backfill => "backfill",
            Self::Rearchive => "rearchive",
        }
    }
}

/// Increment the stored-blob counter by the number of sidecars written.
pub fn record_stored_blobs(count: usize) {
    static BLOBS_STORED: LazyLock<prometheus::IntCounter> = LazyLock::new(|| {
        prometheus::register_int_counter!(
            "blob_archiver_blobs_stored_total",
            "Count of blob sidecars written to storage"
        )
        .unwrap()
    });
    BLOBS_STORED.inc_by(count as u64);
}

/// Increment the processed-block counter for the given source.
pub fn record_processed_block(source: BlockSource) {
    static BLOCKS_PROCESSED: LazyLock<prometheus::IntCounterVec> = LazyLock::new(|| {
        prometheus::register_int_counter_vec!(
            "blob_archiver_blocks_processed_total",
            "Count of blocks processed by the archiver",
            &["source"]
        )
        .unwrap()
    });
    BLOCKS_PROCESSED.with_label_values(&[source.as_str()]).inc();
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
