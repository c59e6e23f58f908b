//! Invocation payloads: the incoming event, the validated upload request and
//! the status-coded response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::UploadError;

/// Triggering payload delivered by the invoking platform
///
/// Only `body` is read; any other keys (headers, request context) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Event {
    #[serde(default)]
    pub body: Option<Value>,
}

impl Event {
    pub fn with_body(body: impl Into<Value>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Validated upload request, echoed back on success
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadRequest {
    pub video_id: String,
    pub user_name: String,
    pub video_url: String,
    pub email: String,
}

/// Response envelope: `{"statusCode": .., "body": {..}}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Option<UploadRequest>,
}

impl Response {
    pub fn success(request: UploadRequest) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                message: None,
                data: Some(request),
            },
        }
    }

    pub fn failure(error: &UploadError) -> Self {
        Self {
            status_code: error.status_code(),
            body: ResponseBody {
                message: Some(error.public_message()),
                data: None,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
