use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::handler::UploadHandler;
use crate::source::{HttpVideoSource, SourceError};
use crate::storage::{ObjectVideoStore, StorageError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Source(#[from] SourceError),

    #[error("failed to open storage: {0}")]
    Storage(#[from] StorageError),
}

/// Process-wide state, built once before the first invocation
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub handler: Arc<UploadHandler>,
}

impl AppState {
    pub fn new(config: Config, handler: UploadHandler) -> Self {
        Self {
            config: Arc::new(config),
            handler: Arc::new(handler),
        }
    }

    /// Build the HTTP client and object store named by `config`
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let source = HttpVideoSource::new(&config.source)?;
        let store = ObjectVideoStore::from_config(&config.storage)?;

        tracing::info!(
            provider = ?config.storage.provider,
            bucket = %config.storage.bucket,
            "Upload handler initialized"
        );

        let handler = UploadHandler::new(Arc::new(source), Arc::new(store));
        Ok(Self::new(config, handler))
    }
}
