//! Shared fixtures: a local video host and handler wiring

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, head},
};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;

use video_ingest::config::{Config, SourceConfig};
use video_ingest::handler::UploadHandler;
use video_ingest::source::HttpVideoSource;
use video_ingest::storage::{ObjectVideoStore, StorageError, StoredVideo, VideoStore};

/// Payload served at `/video.mp4`
pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom";

/// Start a video host on a random local port and return its base URL
pub async fn start_video_host() -> String {
    let app = Router::new()
        .route("/video.mp4", get(serve_video))
        .route("/document.pdf", get(serve_pdf))
        .route("/empty.mp4", get(serve_empty))
        .route("/large.mp4", head(head_large))
        .route("/forbidden.mp4", get(|| async { StatusCode::FORBIDDEN }))
        .route("/no-content.mp4", head(|| async { StatusCode::NO_CONTENT }));

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let bound_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", bound_addr)
}

async fn serve_video() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "video/mp4")],
        Bytes::from_static(VIDEO_BYTES),
    )
}

async fn serve_pdf() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        Bytes::from_static(b"%PDF-1.7"),
    )
}

async fn serve_empty() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "video/mp4")], Bytes::new())
}

async fn head_large() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "video/mp4"),
            (header::CONTENT_LENGTH, "209715200"),
        ],
        (),
    )
}

/// Store that always fails with backend detail that must not leak
pub struct FailingStore;

#[async_trait]
impl VideoStore for FailingStore {
    async fn put_video(
        &self,
        _key: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> Result<StoredVideo, StorageError> {
        Err(StorageError::UploadFailed(
            "SlowDown: internal-bucket-7 rate exceeded".to_string(),
        ))
    }

    fn bucket(&self) -> &str {
        "mocked-bucket"
    }
}

pub fn http_source() -> Arc<HttpVideoSource> {
    Arc::new(HttpVideoSource::new(&SourceConfig::default()).unwrap())
}

/// Handler over the real HTTP client and the given store
pub fn handler_with_store(store: Arc<dyn VideoStore>) -> UploadHandler {
    UploadHandler::new(http_source(), store)
}

pub fn memory_store() -> ObjectVideoStore {
    ObjectVideoStore::in_memory("mocked-bucket")
}

/// Minimal config for tests, bypassing file and environment loading
pub fn test_config() -> Config {
    toml::from_str(
        r#"
[server]
bind_addr = "127.0.0.1:8080"
max_request_bytes = "4KB"

[storage]
provider = "memory"
bucket = "mocked-bucket"
        "#,
    )
    .expect("Failed to parse test config")
}
