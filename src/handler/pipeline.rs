//! The upload pipeline stages, in invocation order
//!
//! Each stage returns only the [`UploadError`] kinds it can produce; mapping
//! them to status codes happens once, in [`super::UploadHandler`].

use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::error::UploadError;
use super::types::{Event, UploadRequest};
use crate::humanize::ByteSize;
use crate::source::{SourceError, VideoSource};
use crate::storage::{StoredVideo, VideoStore, is_valid_key_component};

/// Only MP4 containers are accepted
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Largest remote file accepted, as reported by `Content-Length`
pub const MAX_FILE_SIZE: ByteSize = ByteSize::mebibytes(100);

/// Fields every request must carry, in reporting order
pub const REQUIRED_FIELDS: [&str; 4] = ["video_id", "user_name", "video_url", "email"];

const INVALID_BODY_MESSAGE: &str = "Request body is missing or invalid.";

/// Coerce the event body into a field map
///
/// Accepts a JSON text or an already-decoded object.
pub fn normalize_body(event: &Event) -> Result<Map<String, Value>, UploadError> {
    match &event.body {
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(UploadError::BadInput(INVALID_BODY_MESSAGE.to_string())),
            Err(e) => Err(UploadError::BadInput(format!(
                "Request body is not valid JSON: {}",
                e
            ))),
        },
        Some(Value::Object(map)) => Ok(map.clone()),
        _ => Err(UploadError::BadInput(INVALID_BODY_MESSAGE.to_string())),
    }
}

/// Check that every required field is present and extract them
///
/// Presence is all that is checked: a `null` counts as present, and
/// non-string values are carried as their JSON text.
pub fn validate_request(body: &Map<String, Value>) -> Result<UploadRequest, UploadError> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !body.contains_key(*field))
        .collect();

    if !missing.is_empty() {
        return Err(UploadError::BadInput(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(UploadRequest {
        video_id: field_text(body, "video_id"),
        user_name: field_text(body, "user_name"),
        video_url: field_text(body, "video_url"),
        email: field_text(body, "email"),
    })
}

fn field_text(body: &Map<String, Value>, field: &str) -> String {
    match body.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Check reachability, size and type of the remote video with a HEAD request
///
/// Returns the validated `Content-Length`.
pub async fn validate_video_url(source: &dyn VideoSource, video_url: &str) -> Result<u64, UploadError> {
    info!(video_url, "Validating video link");

    let head = source.head(video_url).await.map_err(|e| match e {
        SourceError::Transport(detail) => UploadError::ProbeTransport(detail),
        other => UploadError::MalformedProbe(other.to_string()),
    })?;

    if head.status != 200 {
        return Err(UploadError::UnreachableResource {
            status: head.status,
        });
    }

    let content_length = match head.content_length.as_deref().map(str::trim) {
        None => 0,
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            UploadError::MalformedProbe(format!("invalid Content-Length header: {:?}", raw))
        })?,
    };

    if content_length == 0 {
        return Err(UploadError::EmptyMedia);
    }

    if content_length > MAX_FILE_SIZE.as_u64() {
        return Err(UploadError::OversizedMedia {
            size: content_length,
            limit: MAX_FILE_SIZE,
        });
    }

    let content_type = head.content_type.unwrap_or_default();
    if content_type != VIDEO_CONTENT_TYPE {
        return Err(UploadError::UnsupportedMedia {
            received: content_type,
            expected: VIDEO_CONTENT_TYPE,
        });
    }

    info!(video_url, content_length, "Video link validated successfully");
    Ok(content_length)
}

/// Fetch the full video payload with a GET request
pub async fn download_video(source: &dyn VideoSource, video_url: &str) -> Result<Bytes, UploadError> {
    info!(video_url, "Downloading video");

    let body = source.get(video_url).await.map_err(|e| match e {
        SourceError::Transport(detail) => UploadError::DownloadTransport(detail),
        other => UploadError::MalformedDownload(other.to_string()),
    })?;

    if body.status != 200 {
        return Err(UploadError::DownloadRejected {
            status: body.status,
        });
    }

    info!(video_url, size = body.bytes.len(), "Video downloaded successfully");
    Ok(body.bytes)
}

/// Deterministic key for a user's source upload
pub fn storage_key(user_name: &str, video_id: &str) -> String {
    format!("videos/{user_name}/{video_id}/upload/{video_id}-source.mp4")
}

/// Build the storage key for `request`, rejecting fields the object store
/// cannot use as path segments
///
/// Runs before any network call so a doomed upload is never downloaded.
pub fn resolve_storage_key(request: &UploadRequest) -> Result<String, UploadError> {
    for (field, value) in [
        ("user_name", &request.user_name),
        ("video_id", &request.video_id),
    ] {
        if !is_valid_key_component(value) {
            return Err(UploadError::BadInput(format!(
                "Invalid {field}: {value:?} cannot be used as a storage path segment."
            )));
        }
    }

    Ok(storage_key(&request.user_name, &request.video_id))
}

/// Write the video bytes under `key` as `video/mp4`
pub async fn store_video(
    store: &dyn VideoStore,
    content: Bytes,
    key: &str,
) -> Result<StoredVideo, UploadError> {
    info!(bucket = store.bucket(), key, "Uploading video to storage");

    store
        .put_video(key, content, VIDEO_CONTENT_TYPE)
        .await
        .map_err(|e| UploadError::StorageFailure(e.to_string()))
}

/// Log when the payload size disagrees with what HEAD reported
///
/// Returns whether the sizes agree. A mismatch never fails the upload.
pub(crate) fn check_downloaded_size(video_url: &str, expected: u64, actual: usize) -> bool {
    let matches = expected == actual as u64;
    if !matches {
        warn!(
            video_url,
            expected,
            actual,
            "Downloaded size differs from validated Content-Length"
        );
    }
    matches
}
