//! Block identifiers accepted by the beacon `headers` endpoint.

use alloy::primitives::B256;
use std::{fmt, str::FromStr};

/// A block identifier: a named checkpoint, a decimal slot, or a block root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId {
    /// The current chain head.
    Head,
    /// The last finalized block.
    Finalized,
    /// The genesis block.
    Genesis,
    /// A block by slot number.
    Slot(u64),
    /// A block by root.
    Root(B256),
}

/// Error returned when a string is not a valid block identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid block id: {0}")]
pub struct InvalidBlockId(pub String);

impl FromStr for BlockId {
    type Err = InvalidBlockId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => return Ok(Self::Head),
            "finalized" => return Ok(Self::Finalized),
            "genesis" => return Ok(Self::Genesis),
            _ => {}
        }

        if let Ok(slot) = s.parse::<u64>() {
            return Ok(Self::Slot(slot));
        }

        // A root is exactly 66 chars of 0x-prefixed hex.
        if s.len() == 66 && s.starts_with("0x") {
            if let Ok(root) = B256::from_str(s) {
                return Ok(Self::Root(root));
            }
        }

        Err(InvalidBlockId(s.to_owned()))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Finalized => f.write_str("finalized"),
            Self::Genesis => f.write_str("genesis"),
            Self::Slot(slot) => write!(f, "{slot}"),
            Self::Root(root) => write!(f, "{root:#x}"),
        }
    }
}

impl From<B256> for BlockId {
    fn from(root: B256) -> Self {
        Self::Root(root)
    }
}
