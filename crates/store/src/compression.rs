//! Gzip helpers for object bodies and API responses.

use crate::{StorageError, StorageResult};
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};

/// The two-byte gzip magic prefix.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether the given bytes start with the gzip magic.
pub fn is_gzipped(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC
}

/// Gzip-compress the given bytes.
pub fn gzip(bytes: &[u8]) -> StorageResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(StorageError::compress)?;
    encoder.finish().map_err(StorageError::compress)
}

/// Decompress gzip-compressed bytes.
pub fn gunzip(bytes: &[u8]) -> StorageResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(StorageError::compress)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let input = b"some blob bytes".repeat(100);
        let compressed = gzip(&input).unwrap();
        assert!(is_gzipped(&compressed));
        assert!(compressed.len() < input.len());
        assert_eq!(gunzip(&compressed).unwrap(), input);
    }

    #[test]
    fn plain_bytes_are_not_gzipped() {
        assert!(!is_gzipped(b"{}"));
        assert!(!is_gzipped(b""));
    }

    #[test]
    fn gunzip_rejects_garbage() {
        assert!(gunzip(b"definitely not gzip").is_err());
    }
}
