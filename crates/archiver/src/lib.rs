//! The blob archival engine.
//!
//! This crate implements the writer side of the archiver:
//!
//! - [`Archiver`] fuses the live-head follower with the reverse chain walker
//!   (backfill), persists sidecars through the
//!   [`ArchiveStore`](blob_archiver_store::ArchiveStore), and owns the
//!   cross-instance lockfile lease.
//! - [`admin_router`] exposes the admin surface: `POST /rearchive` and
//!   `GET /healthz`.
//! - [`ArchiverService`] ties the engine, the admin server and the optional
//!   metrics server into one startable unit with idempotent shutdown.
//!
//! # Write Semantics
//!
//! Sidecar writes are idempotent keyed by block root, and overwriting is
//! opt-in (rearchive only). The first writer wins; concurrent instances are
//! bounded by the advisory lockfile lease, not fenced by it.

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
pub use error::{ArchiverError, ArchiverResult, ServiceError};

pub mod config;
pub use config::{ArchiverConfig, ArchiverOptions, MetricsConfig};

pub mod metrics;

mod retry;

mod archiver;
pub use archiver::{
    Archiver, BACKFILL_ERROR_RETRY_INTERVAL, LIVE_FETCH_BLOB_MAXIMUM_RETRIES, LOCK_TIMEOUT,
    REARCHIVE_MAXIMUM_RETRIES, RearchiveReport, STARTUP_FETCH_BLOB_MAXIMUM_RETRIES,
};

mod admin;
pub use admin::admin_router;

mod service;
pub use service::ArchiverService;
