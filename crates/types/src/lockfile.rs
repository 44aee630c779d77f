//! The cross-instance writer lease.

use serde::{Deserialize, Serialize};

/// The single lock object gating writers.
///
/// The lease is advisory and time-based: the holder refreshes `timestamp`
/// while running, and a competing archiver may claim the lock once the
/// recorded timestamp is older than the lock timeout. A zero-value lockfile
/// is treated as unheld.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Identifier of the archiver holding the lease.
    #[serde(rename = "ArchiverId")]
    pub archiver_id: String,
    /// Seconds since the Unix epoch at the last refresh.
    #[serde(rename = "Timestamp")]
    pub timestamp: u64,
}
