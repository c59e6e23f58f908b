//! Remote video host access
//!
//! The upload handler talks to the remote host through [`VideoSource`]:
//! a metadata-only HEAD followed by a full GET. [`HttpVideoSource`] is the
//! reqwest-backed implementation used outside of tests.

mod http;

pub use http::HttpVideoSource;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection failures and error statuses (4xx/5xx) from the remote host
    #[error("{0}")]
    Transport(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Headers of a HEAD response that the validation step inspects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteHead {
    pub status: u16,
    /// Raw `Content-Length` header value
    pub content_length: Option<String>,
    pub content_type: Option<String>,
}

/// Complete GET response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteBody {
    pub status: u16,
    pub bytes: Bytes,
}

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Issue a HEAD request for `url`
    async fn head(&self, url: &str) -> Result<RemoteHead>;

    /// Issue a GET request for `url` and read the whole body
    async fn get(&self, url: &str) -> Result<RemoteBody>;
}

/// Render an error with its source chain, `outer: inner: root`
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("inner")]
    struct Inner;

    #[test]
    fn test_error_chain_joins_sources() {
        assert_eq!(error_chain(&Outer(Inner)), "outer: inner");
        assert_eq!(error_chain(&Inner), "inner");
    }
}
