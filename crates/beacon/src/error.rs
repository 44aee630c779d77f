//! Error types for beacon node access.

/// Result type alias for beacon node operations.
pub type BeaconResult<T, E = BeaconError> = Result<T, E>;

/// Error type for beacon node operations.
#[derive(Debug, thiserror::Error)]
pub enum BeaconError {
    /// The block (or its sidecars) is unknown to the beacon node.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A retryable upstream fault: connection error, timeout, 5xx or 429.
    #[error("Transient beacon error: {0}")]
    Transient(String),

    /// Any other non-2xx response.
    #[error("Unexpected beacon response status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body failed to decode.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl BeaconError {
    /// Create a new decode error.
    pub fn decode(error: impl core::fmt::Display) -> Self {
        Self::Decode(error.to_string())
    }

    /// Whether this error is the distinguished not-found condition.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether retrying the request may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<reqwest::Error> for BeaconError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transient(error.to_string())
    }
}
