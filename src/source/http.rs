//! reqwest client for the remote video host

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName};
use reqwest::{Client, Proxy, Response};
use std::time::Duration;
use tracing::debug;

use super::{RemoteBody, RemoteHead, Result, SourceError, VideoSource, error_chain};
use crate::config::SourceConfig;

/// HTTP implementation of [`VideoSource`]
///
/// Built once at startup and shared by every invocation.
#[derive(Debug, Clone)]
pub struct HttpVideoSource {
    client: Client,
}

impl HttpVideoSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(url) = &config.proxy {
            let proxy = Proxy::all(url)
                .map_err(|e| SourceError::Client(format!("invalid proxy {}: {}", url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SourceError::Client(error_chain(&e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(map_send_error)?;

        // 4xx/5xx surface as transport errors, the same way as a refused connection
        response
            .error_for_status()
            .map_err(|e| SourceError::Transport(e.to_string()))
    }
}

#[async_trait]
impl VideoSource for HttpVideoSource {
    async fn head(&self, url: &str) -> Result<RemoteHead> {
        debug!(url, "Sending HEAD request");

        let response = self.send(self.client.head(url)).await?;
        let headers = response.headers();

        // Read the header itself: reqwest reports a zero body length for HEAD
        Ok(RemoteHead {
            status: response.status().as_u16(),
            content_length: header_text(headers, CONTENT_LENGTH)?,
            content_type: header_text(headers, CONTENT_TYPE)?,
        })
    }

    async fn get(&self, url: &str) -> Result<RemoteBody> {
        debug!(url, "Sending GET request");

        let response = self.send(self.client.get(url)).await?;
        let status = response.status().as_u16();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Body(error_chain(&e)))?;

        debug!(url, status, size = bytes.len(), "Download completed");

        Ok(RemoteBody { status, bytes })
    }
}

fn map_send_error(err: reqwest::Error) -> SourceError {
    if err.is_builder() {
        SourceError::InvalidUrl(error_chain(&err))
    } else {
        SourceError::Transport(error_chain(&err))
    }
}

fn header_text(headers: &HeaderMap, name: HeaderName) -> Result<Option<String>> {
    headers
        .get(&name)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| SourceError::InvalidResponse(format!("{} header is not valid text", name)))
        })
        .transpose()
}
