use super::blob_repository::BlobRepository;
use crate::domain::tts::BlobLocator;
use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, Client as S3Client};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// AWS S3 implementation of the blob repository
pub struct S3BlobRepository {
    s3_client: Arc<S3Client>,
}

impl S3BlobRepository {
    pub fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }

    /// Stream the object body into a freshly created file
    async fn write_object(&self, locator: &BlobLocator, local_path: &Path) -> Result<u64, String> {
        let output = self
            .s3_client
            .get_object()
            .bucket(&locator.bucket)
            .key(&locator.key)
            .send()
            .await
            .map_err(|e| format!("S3 download error: {}", DisplayErrorContext(&e)))?;

        let mut file = tokio::fs::File::create(local_path)
            .await
            .map_err(|e| format!("Failed to create {}: {}", local_path.display(), e))?;

        let mut body = output.body;
        let mut written: u64 = 0;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| format!("S3 download stream error: {}", e))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| format!("Failed to write {}: {}", local_path.display(), e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| format!("Failed to flush {}: {}", local_path.display(), e))?;

        Ok(written)
    }
}

#[async_trait]
impl BlobRepository for S3BlobRepository {
    async fn check_bucket(&self, bucket: &str) -> Result<(), String> {
        self.s3_client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = bucket,
                    "AWS S3 head_bucket failed"
                );
                format!("S3 error: {}", DisplayErrorContext(&e))
            })
    }

    async fn download(&self, locator: &BlobLocator, local_path: &Path) -> Result<u64, String> {
        let start_time = std::time::Instant::now();

        match self.write_object(locator, local_path).await {
            Ok(bytes) => {
                tracing::debug!(
                    locator = %locator,
                    path = %local_path.display(),
                    audio_size_bytes = bytes,
                    latency_ms = start_time.elapsed().as_millis(),
                    "S3 object downloaded"
                );
                Ok(bytes)
            }
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(local_path).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            path = %local_path.display(),
                            error = %remove_err,
                            "Failed to remove partial download"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn delete(&self, locator: &BlobLocator) -> Result<(), String> {
        self.s3_client
            .delete_object()
            .bucket(&locator.bucket)
            .key(&locator.key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| format!("S3 delete error: {}", DisplayErrorContext(&e)))
    }
}
