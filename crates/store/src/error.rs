//! Error types for storage operations.

/// Result type alias for storage operations.
pub type StorageResult<T, E = StorageError> = Result<T, E>;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested key is absent from the object store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An error occurred in the storage backend.
    #[error("Backend error: {0}")]
    Backend(#[from] Box<dyn core::error::Error + Send + Sync + 'static>),

    /// A persisted or received document failed to encode or decode.
    #[error("Marshal error: {0}")]
    Marshal(String),

    /// A gzip round-trip failed.
    #[error("Compress error: {0}")]
    Compress(String),
}

impl StorageError {
    /// Create a new backend error from any error type.
    pub fn backend<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }

    /// Create a new not-found error for the given key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Create a new marshal error.
    pub fn marshal(error: impl core::fmt::Display) -> Self {
        Self::Marshal(error.to_string())
    }

    /// Create a new compress error.
    pub fn compress(error: impl core::fmt::Display) -> Self {
        Self::Compress(error.to_string())
    }

    /// Whether this error is the distinguished not-found condition.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
