//! The ordered blob sidecar list and its wire encodings.

use crate::{BLOB_SIDECAR_SIZE, BlobSidecar};
use serde::{Deserialize, Serialize};
use ssz::{Decode, DecodeError, Encode};

/// The ordered sequence of blob sidecars for one beacon block.
///
/// Indices are strictly increasing and form a contiguous prefix starting at
/// zero; a block with no blobs is an empty list.
///
/// Because every element is exactly [`BLOB_SIDECAR_SIZE`] bytes, the SSZ form
/// of the list is the plain concatenation of the element SSZ and decoding
/// splits at fixed offsets.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobSidecars {
    /// The sidecars, in index order.
    pub data: Vec<BlobSidecar>,
}

impl BlobSidecars {
    /// Create a new list from sidecars already in index order.
    pub const fn new(data: Vec<BlobSidecar>) -> Self {
        Self { data }
    }

    /// The number of sidecars in the list.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Total SSZ-encoded size of the list.
    pub fn ssz_size(&self) -> usize {
        self.data.len() * BLOB_SIDECAR_SIZE
    }

    /// Encode the list as the concatenation of the element SSZ.
    pub fn to_ssz_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.ssz_size());
        for sidecar in &self.data {
            sidecar.ssz_append(&mut out);
        }
        out
    }

    /// Decode a list from concatenated element SSZ.
    ///
    /// # Errors
    ///
    /// Returns an error if the input length is not a multiple of
    /// [`BLOB_SIDECAR_SIZE`] or an element fails to decode.
    pub fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() % BLOB_SIDECAR_SIZE != 0 {
            return Err(DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: bytes.len().next_multiple_of(BLOB_SIDECAR_SIZE),
            });
        }

        let data = bytes
            .chunks_exact(BLOB_SIDECAR_SIZE)
            .map(BlobSidecar::from_ssz_bytes)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { data })
    }
}

impl From<Vec<BlobSidecar>> for BlobSidecars {
    fn from(data: Vec<BlobSidecar>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobtest;

    #[test]
    fn ssz_round_trip() {
        let sidecars = blobtest::new_blob_sidecars(3);
        let bytes = sidecars.to_ssz_bytes();
        assert_eq!(bytes.len(), 3 * BLOB_SIDECAR_SIZE);

        let decoded = BlobSidecars::from_ssz_bytes(&bytes).unwrap();
        assert_eq!(sidecars, decoded);
    }

    #[test]
    fn empty_list_encodes_to_nothing() {
        let sidecars = BlobSidecars::default();
        assert!(sidecars.to_ssz_bytes().is_empty());
        assert_eq!(BlobSidecars::from_ssz_bytes(&[]).unwrap(), sidecars);
    }

    #[test]
    fn truncated_input_is_rejected() {
        let bytes = blobtest::new_blob_sidecars(2).to_ssz_bytes();
        assert!(BlobSidecars::from_ssz_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn json_round_trip() {
        let sidecars = blobtest::new_blob_sidecars(2);
        let json = serde_json::to_string(&sidecars).unwrap();
        let decoded: BlobSidecars = serde_json::from_str(&json).unwrap();
        assert_eq!(sidecars, decoded);
    }
}
