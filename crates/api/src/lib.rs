//! HTTP read API serving archived blob sidecars.
//!
//! Exposes the standard `GET /eth/v1/beacon/blob_sidecars/{id}` endpoint
//! backed by the archive store. The beacon node is consulted only to resolve
//! symbolic identifiers (`head`, `finalized`, `genesis`, slot numbers) to a
//! block root; sidecars themselves are always served from storage.
//!
//! Responses are encoded as JSON or SSZ depending on the `Accept` header,
//! optionally gzip-compressed when the client advertises
//! `Accept-Encoding: gzip`.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::HttpError;

pub mod metrics;

mod version;
pub use version::version_string;

mod config;
pub use config::{ApiConfig, ConfigError, MetricsConfig};

mod service;
pub use service::{AlreadyStopped, ApiService, api_router};
