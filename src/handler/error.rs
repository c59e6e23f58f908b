use thiserror::Error;

use crate::humanize::ByteSize;

/// Every way an upload invocation can fail
///
/// The `Display` text of a client-attributable variant is returned to the
/// caller verbatim, so it must stay free of internal detail.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Missing or malformed body, missing fields
    #[error("{0}")]
    BadInput(String),

    #[error("The URL is invalid or inaccessible.")]
    UnreachableResource { status: u16 },

    #[error("Failed to download video. HTTP status code: {status}")]
    DownloadRejected { status: u16 },

    #[error("The file is empty.")]
    EmptyMedia,

    #[error("The file size exceeds the {limit} limit.")]
    OversizedMedia { size: u64, limit: ByteSize },

    #[error("Invalid content type: {received}. Expected {expected}.")]
    UnsupportedMedia {
        received: String,
        expected: &'static str,
    },

    #[error("Failed to validate the video link: {0}")]
    ProbeTransport(String),

    #[error("Failed to download the video: {0}")]
    DownloadTransport(String),

    /// Unusable URL or HEAD metadata
    #[error("Unexpected error during video link validation: {0}")]
    MalformedProbe(String),

    /// Unusable URL or unreadable GET body
    #[error("Unexpected error during video download: {0}")]
    MalformedDownload(String),

    #[error("Failed to upload video to S3: {0}")]
    StorageFailure(String),

    #[error("internal error: {0}")]
    Unexpected(String),
}

/// Message returned with every 500 response
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

impl UploadError {
    /// Whether the caller can fix the failure by changing the request
    pub fn is_client_error(&self) -> bool {
        match self {
            UploadError::BadInput(_)
            | UploadError::UnreachableResource { .. }
            | UploadError::DownloadRejected { .. }
            | UploadError::EmptyMedia
            | UploadError::OversizedMedia { .. }
            | UploadError::UnsupportedMedia { .. }
            | UploadError::ProbeTransport(_)
            | UploadError::DownloadTransport(_)
            | UploadError::MalformedProbe(_)
            | UploadError::MalformedDownload(_) => true,
            UploadError::StorageFailure(_) | UploadError::Unexpected(_) => false,
        }
    }

    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// Text safe to return to the caller
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UploadError::BadInput(_) => "BAD_INPUT",
            UploadError::UnreachableResource { .. } | UploadError::DownloadRejected { .. } => {
                "UNREACHABLE_RESOURCE"
            }
            UploadError::EmptyMedia => "EMPTY_MEDIA",
            UploadError::OversizedMedia { .. } => "OVERSIZED_MEDIA",
            UploadError::UnsupportedMedia { .. } => "UNSUPPORTED_MEDIA",
            UploadError::ProbeTransport(_) | UploadError::DownloadTransport(_) => {
                "TRANSPORT_FAILURE"
            }
            UploadError::MalformedProbe(_) | UploadError::MalformedDownload(_) => {
                "MALFORMED_RESOURCE"
            }
            UploadError::StorageFailure(_) => "STORAGE_FAILURE",
            UploadError::Unexpected(_) => "UNEXPECTED",
        }
    }
}
