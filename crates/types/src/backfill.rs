//! The persisted backfill-process registry.

use crate::BlockHeaderData;
use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single in-flight (or interrupted) backfill walk.
///
/// `current` is an ancestor-or-equal of `start` along the chain as it existed
/// when the walk began; `current.slot <= start.slot`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillProcess {
    /// The header the walk was seeded with.
    #[serde(rename = "Start")]
    pub start: BlockHeaderData,
    /// The most recently persisted block of the walk.
    #[serde(rename = "Current")]
    pub current: BlockHeaderData,
}

impl BackfillProcess {
    /// Create a fresh process positioned at its seed.
    pub fn new(start: BlockHeaderData) -> Self {
        Self { current: start.clone(), start }
    }
}

/// All known backfill walks, keyed by the seed's block root.
///
/// Persisted as a single object under the well-known `backfill_processes`
/// key. Entries are added when a walk is seeded, rewritten as the walk
/// advances, and removed when the walk reaches the origin or an
/// already-stored block.
pub type BackfillProcesses = HashMap<B256, BackfillProcess>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobtest;

    #[test]
    fn json_uses_go_style_field_names() {
        let header = blobtest::header(10, blobtest::ONE, blobtest::ORIGIN_BLOCK);
        let mut processes = BackfillProcesses::default();
        processes.insert(header.root, BackfillProcess::new(header.clone()));

        let json = serde_json::to_value(&processes).unwrap();
        let entry = &json[crate::root_key(&header.root)];
        assert!(entry["Start"].is_object());
        assert!(entry["Current"].is_object());

        let decoded: BackfillProcesses = serde_json::from_value(json).unwrap();
        assert_eq!(processes, decoded);
    }

    #[test]
    fn new_process_starts_at_its_seed() {
        let header = blobtest::header(12, blobtest::TWO, blobtest::ONE);
        let process = BackfillProcess::new(header.clone());
        assert_eq!(process.start, header);
        assert_eq!(process.current, header);
    }
}
