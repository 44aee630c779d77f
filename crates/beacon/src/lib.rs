//! Beacon node client for the blob archiver.
//!
//! The archiver and read API consume the beacon node through the
//! [`BeaconSource`] capability trait: headers by block identifier and blob
//! sidecars by block root. [`HttpBeaconSource`] is the production
//! implementation; tests supply the in-memory [`stub::StubBeaconSource`].
//!
//! The beacon node is trusted: no KZG verification happens on the returned
//! sidecars.
//!
//! # Feature Flags
//!
//! - **`test-utils`**: enables the [`stub`] module.

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
pub use error::{BeaconError, BeaconResult};

mod id;
pub use id::{BlockId, InvalidBlockId};

mod traits;
pub use traits::BeaconSource;

mod client;
pub use client::{BeaconClientConfig, DEFAULT_BEACON_TIMEOUT, HttpBeaconSource};

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod stub;
