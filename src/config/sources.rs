use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "VIDEO_INGEST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/video-ingest.toml";
const ENV_PREFIX: &str = "VIDEO_INGEST";
const ENV_SEPARATOR: &str = "__";

/// Plain deployment variable naming the destination bucket
const BUCKET_ENV_VAR: &str = "BUCKET_NAME";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables, then `BUCKET_NAME` and credentials
pub fn load() -> Result<Config, ConfigError> {
    // A missing .env is the normal case in deployed environments
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    apply_env_overrides(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// Apply the bucket override and storage secrets from `lookup`
///
/// Secrets are never read from TOML files, only from the environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(bucket) = lookup(BUCKET_ENV_VAR).filter(|b| !b.is_empty()) {
        config.storage.bucket = bucket;
    }

    config.storage.access_key = lookup("S3_ACCESS_KEY").or_else(|| lookup("AWS_ACCESS_KEY_ID"));
    config.storage.secret_key =
        lookup("S3_SECRET_KEY").or_else(|| lookup("AWS_SECRET_ACCESS_KEY"));

    if config.storage.region.is_none() {
        config.storage.region = lookup("AWS_REGION");
    }
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // VIDEO_INGEST__STORAGE__BUCKET -> storage.bucket
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}
