//! The JSON error body of the read API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Error body returned by every failing read API request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    /// The HTTP status code, mirrored into the body.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl HttpError {
    /// 404 for an unknown block.
    pub fn unknown_block() -> Self {
        Self { code: 404, message: "Block not found".to_owned() }
    }

    /// 500 for storage or upstream faults.
    pub fn server_error() -> Self {
        Self { code: 500, message: "Internal server error".to_owned() }
    }

    /// 400 for an unparsable block identifier.
    pub fn invalid_block_id(input: &str) -> Self {
        Self { code: 400, message: format!("invalid block id: {input}") }
    }

    /// 400 for an unparsable index.
    pub fn invalid_index_input(input: &str) -> Self {
        Self { code: 400, message: format!("invalid index input: {input}") }
    }

    /// 400 for an index past the block's blob count.
    pub fn invalid_index(index: u64, blob_count: usize) -> Self {
        Self { code: 400, message: format!("invalid index: {index} block contains {blob_count} blobs") }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_match_the_wire_format() {
        let err = HttpError::unknown_block();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 404);
        assert_eq!(json["message"], "Block not found");

        let err = HttpError::invalid_index(10, 6);
        assert_eq!(err.message, "invalid index: 10 block contains 6 blobs");

        let err = HttpError::invalid_index_input("-2");
        assert_eq!(err.message, "invalid index input: -2");
    }
}
