use crate::domain::tts::{RemoteJobStatus, SynthesisRequest};
use async_trait::async_trait;

/// Repository for asynchronous speech synthesis jobs.
/// Abstracts the underlying TTS provider (AWS Polly today).
///
/// Implementations never render audio locally: the provider writes the
/// result into object storage under the requested key prefix and reports the
/// final location once the job completes.
#[async_trait]
pub trait SynthesisRepository: Send + Sync {
    /// Start one synthesis job
    ///
    /// Returns the provider-assigned job id
    ///
    /// # Errors
    /// Returns error if the provider rejects the request (quota, invalid
    /// voice, malformed SSML) or is unreachable
    async fn begin_job(&self, request: &SynthesisRequest) -> Result<String, String>;

    /// Fetch the current status of a job
    async fn poll_job(&self, job_id: &str) -> Result<RemoteJobStatus, String>;
}
