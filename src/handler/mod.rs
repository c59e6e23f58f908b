//! Video upload request handler
//!
//! One invocation runs a straight pipeline:
//! normalize body → validate fields → resolve storage key →
//! validate remote video (HEAD) → download (GET) → store → respond.
//!
//! ## Example
//!
//! ```rust,ignore
//! use video_ingest::handler::{Event, UploadHandler};
//!
//! let handler = Arc::new(UploadHandler::new(source, store));
//! let response = handler.handle(Event::with_body(r#"{"video_id": "123", ...}"#)).await;
//! assert_eq!(response.status_code, 200);
//! ```

mod error;
pub mod pipeline;
mod types;

pub use error::{GENERIC_FAILURE_MESSAGE, UploadError};
pub use pipeline::{
    MAX_FILE_SIZE, REQUIRED_FIELDS, VIDEO_CONTENT_TYPE, resolve_storage_key, storage_key,
};
pub use types::{Event, Response, ResponseBody, UploadRequest};

use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::observability::Metrics;
use crate::source::VideoSource;
use crate::storage::{StoredVideo, VideoStore};

/// Process-wide handler: built once at startup, shared by every invocation
pub struct UploadHandler {
    source: Arc<dyn VideoSource>,
    store: Arc<dyn VideoStore>,
    metrics: Arc<Metrics>,
}

impl UploadHandler {
    pub fn new(source: Arc<dyn VideoSource>, store: Arc<dyn VideoStore>) -> Self {
        Self::with_metrics(source, store, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(
        source: Arc<dyn VideoSource>,
        store: Arc<dyn VideoStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            source,
            store,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    /// Run one invocation and build its response
    ///
    /// Never fails: every error becomes a 400 or 500 response. A panic inside
    /// the pipeline is reported as a 500 as well.
    pub async fn handle(self: Arc<Self>, event: Event) -> Response {
        let request_id = Uuid::now_v7();
        let span = info_span!("upload", %request_id);

        let handler = Arc::clone(&self);
        let outcome = tokio::spawn(async move { handler.process(&event).await }.instrument(span.clone()))
            .await
            .unwrap_or_else(|join_error| Err(UploadError::Unexpected(join_error.to_string())));

        let _entered = span.enter();
        self.respond(outcome)
    }

    /// The pipeline itself, without panic isolation
    pub async fn process(&self, event: &Event) -> Result<(UploadRequest, StoredVideo), UploadError> {
        let body = pipeline::normalize_body(event)?;
        let request = pipeline::validate_request(&body)?;

        info!(
            user_name = %request.user_name,
            video_id = %request.video_id,
            "Processing video upload"
        );

        let key = pipeline::resolve_storage_key(&request)?;

        let expected_size =
            pipeline::validate_video_url(self.source.as_ref(), &request.video_url).await?;
        let content = pipeline::download_video(self.source.as_ref(), &request.video_url).await?;
        pipeline::check_downloaded_size(&request.video_url, expected_size, content.len());

        let stored = pipeline::store_video(self.store.as_ref(), content, &key).await?;

        Ok((request, stored))
    }

    fn respond(&self, outcome: Result<(UploadRequest, StoredVideo), UploadError>) -> Response {
        match outcome {
            Ok((request, stored)) => {
                info!(key = %stored.key, size = stored.size, "Video upload completed");
                self.metrics.upload_succeeded(stored.size as u64);
                Response::success(request)
            }
            Err(err) if err.is_client_error() => {
                warn!(code = err.code(), error = %err, "Upload rejected");
                self.metrics.upload_rejected();
                Response::failure(&err)
            }
            Err(err) => {
                error!(code = err.code(), error = %err, "Upload failed");
                self.metrics.upload_failed();
                Response::failure(&err)
            }
        }
    }
}
