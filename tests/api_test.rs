//! HTTP surface tests driven through the router with `oneshot`

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use flate2::{Compression, write::GzEncoder};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Arc;
use tower::ServiceExt;

use common::{handler_with_store, memory_store, start_video_host, test_config};
use video_ingest::api::{AppState, router};

fn test_state() -> AppState {
    AppState::new(test_config(), handler_with_store(Arc::new(memory_store())))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn upload_payload(video_url: &str) -> Value {
    json!({
        "video_id": "123",
        "user_name": "testuser",
        "video_url": video_url,
        "email": "testuser@example.com"
    })
}

#[tokio::test]
async fn test_health() {
    let app = router(test_state());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["bucket"], "mocked-bucket");
    assert_eq!(body["metrics"]["uploads_succeeded"], 0);
}

#[tokio::test]
async fn test_videos_success_returns_request_echo() {
    let base_url = start_video_host().await;
    let app = router(test_state());
    let payload = upload_payload(&format!("{}/video.mp4", base_url));

    let response = app
        .oneshot(
            Request::post("/videos")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, payload);
}

#[tokio::test]
async fn test_videos_status_mirrors_handler() {
    let base_url = start_video_host().await;
    let app = router(test_state());
    let payload = upload_payload(&format!("{}/document.pdf", base_url));

    let response = app
        .oneshot(
            Request::post("/videos")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid content type: application/pdf. Expected video/mp4."})
    );
}

#[tokio::test]
async fn test_videos_missing_fields() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::post("/videos")
                .body(Body::from(r#"{"video_id": "123", "email": null}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "Missing required fields: user_name, video_url"
    );
}

#[tokio::test]
async fn test_videos_invalid_json() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::post("/videos")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Request body is not valid JSON:")
    );
}

#[tokio::test]
async fn test_videos_rejects_non_json_content_type() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::post("/videos")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "UNSUPPORTED_CONTENT_TYPE");
}

#[tokio::test]
async fn test_videos_body_limit() {
    let app = router(test_state());
    let oversized = "x".repeat(8 * 1024);

    let response = app
        .oneshot(
            Request::post("/videos")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_LENGTH, oversized.len())
                .body(Body::from(oversized))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_invoke_wraps_envelope() {
    let base_url = start_video_host().await;
    let app = router(test_state());
    let payload = upload_payload(&format!("{}/video.mp4", base_url));
    let event = json!({ "body": payload.to_string() });

    let response = app
        .oneshot(
            Request::post("/invoke")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "statusCode": 200, "body": payload })
    );
}

#[tokio::test]
async fn test_invoke_failure_still_replies_200() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::post("/invoke")
                .body(Body::from(r#"{"body": null}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "statusCode": 400,
            "body": {"message": "Request body is missing or invalid."}
        })
    );
}

#[tokio::test]
async fn test_invoke_accepts_object_body() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::post("/invoke")
                .body(Body::from(r#"{"body": {"video_id": "1"}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["statusCode"], 400);
    assert_eq!(
        body["body"]["message"],
        "Missing required fields: user_name, video_url, email"
    );
}

#[tokio::test]
async fn test_invoke_rejects_malformed_event() {
    let app = router(test_state());

    let response = app
        .oneshot(Request::post("/invoke").body(Body::from("[1, 2")).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_EVENT");
}

#[tokio::test]
async fn test_videos_accepts_gzip_body() {
    let base_url = start_video_host().await;
    let app = router(test_state());
    let payload = upload_payload(&format!("{}/video.mp4", base_url));

    let response = app
        .oneshot(
            Request::post("/videos")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_ENCODING, "gzip")
                .body(Body::from(gzip(payload.to_string().as_bytes())))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, payload);
}

#[tokio::test]
async fn test_videos_limit_applies_to_decompressed_body() {
    let app = router(test_state());

    // Compresses far below the 4KB limit, expands well past it
    let mut payload = upload_payload("http://x/video.mp4");
    payload["padding"] = Value::String("x".repeat(64 * 1024));
    let compressed = gzip(payload.to_string().as_bytes());
    assert!(compressed.len() < 4 * 1024);

    let response = app
        .oneshot(
            Request::post("/videos")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_ENCODING, "gzip")
                .body(Body::from(compressed))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(response).await["code"], "PAYLOAD_TOO_LARGE");
}
