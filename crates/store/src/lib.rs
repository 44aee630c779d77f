//! Object store abstraction for the blob archiver.
//!
//! This crate defines the storage seam the archiver and read API are written
//! against:
//!
//! - [`ObjectStore`] is the low-level capability trait: exists / get / put of
//!   opaque objects under flat string keys. Concrete backends live in
//!   `blob-archiver-store-s3` and `blob-archiver-store-file`.
//! - [`ArchiveStore`] is the typed facade over any backend: sidecar objects
//!   keyed by block root, the backfill-process registry, and the lockfile.
//!
//! # Feature Flags
//!
//! - **`test-utils`**: enables the in-memory [`mem::MemStore`] backend and
//!   the [`conformance`] suite that every backend is expected to pass.

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
pub use error::{StorageError, StorageResult};

mod traits;
pub use traits::{CONTENT_ENCODING_GZIP, CONTENT_TYPE_JSON, Object, ObjectStore};

mod compression;
pub use compression::{gunzip, gzip, is_gzipped};

mod archive;
pub use archive::{ArchiveStore, BACKFILL_PROCESSES_KEY, LOCKFILE_KEY};

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mem;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod conformance;
