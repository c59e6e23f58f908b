//! API utility functions
//!
//! Pure, stateless helpers for HTTP request processing.

use crate::api::error::ApiError;

/// Parses and validates Content-Type header for application/json
///
/// Accepts `application/json` with or without parameters; rejects
/// `application/jsonp`, `application/json-patch+json`, `text/json` and
/// malformed media types.
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type
        .parse()
        .map_err(|_| ApiError::UnsupportedContentType(content_type.to_string()))?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::UnsupportedContentType(content_type.to_string()));
    }

    Ok(media_type)
}

/// Decode a request body as UTF-8 text, `None` when it is not text
pub fn body_text(data: &[u8]) -> Option<String> {
    std::str::from_utf8(data).ok().map(str::to_owned)
}
