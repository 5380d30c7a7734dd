//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// Every request either returns a complete payload or one of these; none of
/// them is fatal to the process. The status mapping is uniform: 401 for a
/// missing session, 404 for a missing document, 422 for rejected input, 415
/// and 413 for upload screening, 500 for any store failure.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No logged-in user in the request's session
    #[error("Nobody currently logged in")]
    Unauthenticated,

    /// Referenced document does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request payload failed a presence check
    #[error("{0}")]
    Validation(String),

    /// Upload rejected by the extension/MIME allow-list
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Upload exceeds the size limit
    #[error("Payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),

    /// Underlying persistence failure
    #[error("Store error")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ApiError::Store(ref e) => {
                tracing::error!("Store error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Store error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping_is_consistent() {
        assert_eq!(status_of(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::NotFound("user")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::Validation("comment needs to be nonempty".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ApiError::UnsupportedMediaType("text/plain".into())),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of(ApiError::PayloadTooLarge(1_000_000)),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(ApiError::Store(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
