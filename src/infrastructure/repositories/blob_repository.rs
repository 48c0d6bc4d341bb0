use crate::domain::tts::BlobLocator;
use async_trait::async_trait;
use std::path::Path;

/// Repository for the object storage that receives synthesized audio
#[async_trait]
pub trait BlobRepository: Send + Sync {
    /// Verify the bucket exists and is reachable with the current credentials
    async fn check_bucket(&self, bucket: &str) -> Result<(), String>;

    /// Download an object to `local_path`, returning the number of bytes written
    ///
    /// On error nothing is left at `local_path`
    async fn download(&self, locator: &BlobLocator, local_path: &Path) -> Result<u64, String>;

    /// Delete an object
    async fn delete(&self, locator: &BlobLocator) -> Result<(), String>;
}
