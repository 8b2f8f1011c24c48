//! Object storage port and per-invocation staging
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use s3_utils::S3Operations;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Source of triggering objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download `bucket/key` into `dest`, returning the number of bytes written
    async fn download_to_path(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64>;
}

#[async_trait]
impl ObjectStore for S3Operations {
    async fn download_to_path(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        Ok(S3Operations::download_to_path(self, bucket, key, dest).await?)
    }
}

/// Uniquely named local file holding one fetched object.
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct StagedObject {
    file: NamedTempFile,
}

impl StagedObject {
    /// Reserve a fresh file in `dir`
    pub fn create_in(dir: &Path) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("relay-")
            .suffix(".obj")
            .tempfile_in(dir)
            .map_err(|e| {
                RelayError::Fetch(format!("failed to create staging file in {}: {e}", dir.display()))
            })?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the staged bytes back
    pub async fn read(&self) -> Result<Vec<u8>> {
        tokio::fs::read(self.path())
            .await
            .map_err(|e| RelayError::Fetch(format!("failed to read staged object: {e}")))
    }
}

/// Staging directory shared by concurrent invocations
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn stage(&self) -> Result<StagedObject> {
        StagedObject::create_in(&self.dir)
    }
}
