//! Object storage for downloaded videos
//! Uses Apache Arrow object_store crate

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload, path::Path as StoragePath};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageConfig, StorageProvider};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Metadata returned after a successful put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVideo {
    pub key: String,
    pub size: usize,
    pub e_tag: Option<String>,
}

/// The "put object" capability the upload handler depends on
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Write `data` under `key` with the given content type
    async fn put_video(&self, key: &str, data: Bytes, content_type: &str) -> Result<StoredVideo>;

    /// Destination bucket, for logs and health output
    fn bucket(&self) -> &str;
}

/// Whether `value` can be spliced into an object key as one or more path segments
///
/// Object keys may not contain empty, `.` or `..` segments.
pub fn is_valid_key_component(value: &str) -> bool {
    value
        .split('/')
        .all(|segment| !segment.is_empty() && StoragePath::parse(segment).is_ok())
}

/// [`VideoStore`] backed by any object_store backend
#[derive(Clone)]
pub struct ObjectVideoStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    // LocalFileSystem rejects puts that carry attributes
    content_type_attribute: bool,
}

impl ObjectVideoStore {
    /// Wrap an existing object store
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            content_type_attribute: true,
        }
    }

    /// In-memory storage for tests and local runs
    pub fn in_memory(bucket: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), bucket)
    }

    /// Build the backend selected by configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.provider {
            StorageProvider::S3 => {
                let mut builder =
                    AmazonS3Builder::from_env().with_bucket_name(config.bucket.clone());

                if let Some(region) = &config.region {
                    builder = builder.with_region(region.clone());
                }

                if let Some(endpoint) = &config.endpoint {
                    builder = builder
                        .with_endpoint(endpoint.clone())
                        .with_allow_http(endpoint.starts_with("http://"));
                }

                if let (Some(access_key), Some(secret_key)) =
                    (&config.access_key, &config.secret_key)
                {
                    builder = builder
                        .with_access_key_id(access_key.clone())
                        .with_secret_access_key(secret_key.clone());
                }

                let store = builder
                    .build()
                    .map_err(|e| StorageError::Config(e.to_string()))?;

                Ok(Self::new(Arc::new(store), config.bucket.clone()))
            }
            StorageProvider::Local => {
                let root = config
                    .root
                    .as_ref()
                    .ok_or_else(|| StorageError::Config("storage.root is not set".to_string()))?
                    .join(&config.bucket);

                std::fs::create_dir_all(&root).map_err(|e| {
                    StorageError::Config(format!("cannot create {}: {}", root.display(), e))
                })?;

                let store = LocalFileSystem::new_with_prefix(&root)?;

                Ok(Self {
                    store: Arc::new(store),
                    bucket: config.bucket.clone(),
                    content_type_attribute: false,
                })
            }
            StorageProvider::Memory => Ok(Self::in_memory(config.bucket.clone())),
        }
    }

    /// Underlying store, for reading back what was written
    pub fn inner(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl VideoStore for ObjectVideoStore {
    async fn put_video(&self, key: &str, data: Bytes, content_type: &str) -> Result<StoredVideo> {
        let path = StoragePath::parse(key)
            .map_err(|e| StorageError::UploadFailed(format!("invalid key {key}: {e}")))?;
        let size = data.len();

        let mut opts = PutOptions::default();
        if self.content_type_attribute {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            opts.attributes = attributes;
        }

        let put_result = self
            .store
            .put_opts(&path, PutPayload::from(data), opts)
            .await?;

        tracing::info!(bucket = %self.bucket, key, size, "Uploaded to storage");

        Ok(StoredVideo {
            key: key.to_string(),
            size,
            e_tag: put_result.e_tag,
        })
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
