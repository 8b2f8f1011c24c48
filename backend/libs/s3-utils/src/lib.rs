/// Shared object storage utilities
///
/// Provides an S3 client for S3-compatible endpoints (Huawei OBS in
/// path-style mode, MinIO, AWS) together with the download operations the
/// relay needs.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod operations;

pub use config::S3Config;
pub use operations::S3Operations;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, S3Error>;

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum S3Error {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("storage request failed: {0}")]
    Request(String),

    #[error("failed to stream object body: {0}")]
    Body(String),

    #[error("local I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Client {
    /// Create new S3 client with custom configuration
    pub async fn with_config(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.clone());

        if let Some((access_key, secret_key)) = config.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "invocation-context",
            ));
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            path_style = config.path_style,
            "S3 client initialized"
        );

        Self {
            client: Arc::new(Client::from_conf(s3_config)),
            config,
        }
    }

    /// Get S3 configuration
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Operations handle sharing this client
    pub fn operations(&self) -> S3Operations {
        S3Operations::new(self.client.clone())
    }
}
