use super::models::{Config, StorageProvider};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Destination bucket is not configured (set BUCKET_NAME or storage.bucket)")]
    MissingBucket,

    #[error("Storage provider is local but storage.root is not set")]
    MissingLocalRoot,

    #[error("S3 credentials are incomplete: both access_key and secret_key are required")]
    PartialS3Credentials,

    #[error("max_request_bytes must be positive")]
    InvalidRequestLimit,

    #[error("Invalid proxy URL '{proxy}', expected an http://, https:// or socks5:// scheme")]
    InvalidProxyScheme { proxy: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_storage(config)?;
    validate_server(config)?;
    validate_source(config)?;
    Ok(())
}

fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    let storage = &config.storage;

    if storage.bucket.trim().is_empty() {
        return Err(ValidationError::MissingBucket);
    }

    if storage.provider == StorageProvider::Local && storage.root.is_none() {
        return Err(ValidationError::MissingLocalRoot);
    }

    // Neither half means the ambient AWS credential chain is used
    if storage.provider == StorageProvider::S3
        && storage.access_key.is_some() != storage.secret_key.is_some()
    {
        return Err(ValidationError::PartialS3Credentials);
    }

    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_request_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidRequestLimit);
    }

    Ok(())
}

fn validate_source(config: &Config) -> Result<(), ValidationError> {
    if let Some(proxy) = &config.source.proxy {
        let supported = ["http://", "https://", "socks5://"];
        if !supported.iter().any(|scheme| proxy.starts_with(scheme)) {
            return Err(ValidationError::InvalidProxyScheme {
                proxy: proxy.clone(),
            });
        }
    }

    Ok(())
}
