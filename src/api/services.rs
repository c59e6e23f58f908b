use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use http_body_util::{BodyExt, LengthLimitError};
use serde_json::Value;
use std::sync::Arc;

use super::{
    models::HealthResponse,
    state::AppState,
    utils::{body_text, parse_content_type},
};
use crate::api::error::ApiError;
use crate::handler::Event;

/// Platform-style invocation endpoint (POST /invoke)
///
/// The request body is a whole event (`{"body": ...}`). The reply is always
/// 200 with the handler's `{statusCode, body}` envelope, the way a function
/// runtime reports the result of an invocation.
pub async fn invoke(
    State(state): State<AppState>,
    body: Body,
) -> Result<impl IntoResponse, ApiError> {
    let data = read_body(body, request_limit(&state)).await?;
    let event: Event =
        serde_json::from_slice(&data).map_err(|e| ApiError::InvalidEvent(e.to_string()))?;

    let response = Arc::clone(&state.handler).handle(event).await;

    Ok(Json(response))
}

/// Direct upload endpoint (POST /videos)
///
/// The request body is the upload request itself. The HTTP status mirrors
/// the envelope's `statusCode` and the JSON body is the envelope's `body`.
pub async fn upload_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<impl IntoResponse, ApiError> {
    // Absent Content-Type is tolerated; anything else must be JSON
    if let Some(value) = headers.get(header::CONTENT_TYPE) {
        let content_type = value
            .to_str()
            .map_err(|_| {
                ApiError::UnsupportedContentType(
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })?;
        parse_content_type(content_type)?;
    }

    let data = read_body(body, request_limit(&state)).await?;

    // Non-UTF-8 bodies reach the handler as a missing body
    let event = Event {
        body: body_text(&data).map(Value::String),
    };

    let response = Arc::clone(&state.handler).handle(event).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok((status, Json(response.body)))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        bucket: state.handler.bucket().to_string(),
        metrics: state.handler.metrics().snapshot(),
    })
}

fn request_limit(state: &AppState) -> usize {
    usize::try_from(state.config.server.max_request_bytes.as_u64()).unwrap_or(usize::MAX)
}

/// Reads the request body
///
/// Decompression and the size limit are applied by middleware; a body that
/// overruns the limit mid-stream surfaces here as a [`LengthLimitError`].
async fn read_body(body: Body, limit: usize) -> Result<Bytes, ApiError> {
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => {
            let source = err.into_inner();
            let over_limit = std::iter::successors(
                Some(&*source as &(dyn std::error::Error + 'static)),
                |e| e.source(),
            )
            .any(|e| e.is::<LengthLimitError>());

            if over_limit {
                Err(ApiError::PayloadTooLarge(limit))
            } else {
                Err(ApiError::UnreadableBody(source.to_string()))
            }
        }
    }
}
