use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;

/// Failures of the HTTP surface itself, raised before the upload handler runs
///
/// Upload failures are not `ApiError`s: they travel in the handler's
/// response envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `/videos` called with a non-JSON media type
    #[error("unsupported Content-Type {0:?}, expected application/json")]
    UnsupportedContentType(String),

    /// `/invoke` body is not an invocation event
    #[error("invocation event is not a JSON object: {0}")]
    InvalidEvent(String),

    #[error("failed to read request body: {0}")]
    UnreadableBody(String),

    #[error("request body exceeds the {0} byte limit")]
    PayloadTooLarge(usize),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedContentType(_)
            | ApiError::InvalidEvent(_)
            | ApiError::UnreadableBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UnsupportedContentType(_) => "UNSUPPORTED_CONTENT_TYPE",
            ApiError::InvalidEvent(_) => "INVALID_EVENT",
            ApiError::UnreadableBody(_) => "UNREADABLE_BODY",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
