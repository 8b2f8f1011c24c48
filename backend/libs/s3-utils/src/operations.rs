/// S3 download operations
use crate::{Result, S3Error};
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
use aws_sdk_s3::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
}

impl S3Operations {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Stream an object into a local file, returning the number of bytes written
    pub async fn download_to_path(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let response = self.get_object(bucket, key).await?;

        let mut body = response.body;
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| S3Error::Body(e.to_string()))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bucket = %bucket, key = %key, size = written, "Object downloaded");
        Ok(written)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<GetObjectOutput> {
        self.client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_get_error(bucket, key, e))
    }
}

fn map_get_error(bucket: &str, key: &str, err: SdkError<GetObjectError, HttpResponse>) -> S3Error {
    let not_found = err
        .as_service_error()
        .map(GetObjectError::is_no_such_key)
        .unwrap_or(false);

    if not_found {
        S3Error::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    } else {
        S3Error::Request(DisplayErrorContext(&err).to_string())
    }
}
