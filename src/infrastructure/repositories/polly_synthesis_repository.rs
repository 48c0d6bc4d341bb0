use super::synthesis_repository::SynthesisRepository;
use crate::domain::tts::{RemoteJobStatus, RemoteTaskStatus, SynthesisRequest};
use async_trait::async_trait;
use aws_sdk_polly::{
    error::DisplayErrorContext,
    types::{Engine, LanguageCode, OutputFormat, TaskStatus, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly implementation of the synthesis repository, backed by
/// `StartSpeechSynthesisTask` / `GetSpeechSynthesisTask`
pub struct PollySynthesisRepository {
    polly_client: Arc<PollyClient>,
}

impl PollySynthesisRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    fn map_status(status: Option<&TaskStatus>) -> RemoteTaskStatus {
        match status {
            Some(TaskStatus::Scheduled) => RemoteTaskStatus::Scheduled,
            Some(TaskStatus::InProgress) => RemoteTaskStatus::InProgress,
            Some(TaskStatus::Completed) => RemoteTaskStatus::Completed,
            Some(TaskStatus::Failed) => RemoteTaskStatus::Failed,
            Some(other) => RemoteTaskStatus::Unknown(other.as_str().to_string()),
            None => RemoteTaskStatus::Unknown("missing".to_string()),
        }
    }
}

#[async_trait]
impl SynthesisRepository for PollySynthesisRepository {
    async fn begin_job(&self, request: &SynthesisRequest) -> Result<String, String> {
        tracing::debug!(
            voice = %request.voice_id,
            engine = %request.engine,
            output_format = %request.output_format,
            language_code = ?request.language_code,
            bucket = %request.bucket,
            key_prefix = %request.key_prefix,
            ssml_length = request.ssml.len(),
            "Calling AWS Polly start_speech_synthesis_task"
        );

        let output = self
            .polly_client
            .start_speech_synthesis_task()
            .text(&request.ssml)
            .text_type(TextType::Ssml)
            .voice_id(VoiceId::from(request.voice_id.as_str()))
            .output_format(OutputFormat::from(request.output_format.as_str()))
            .engine(Engine::from(request.engine.as_str()))
            .set_language_code(request.language_code.as_deref().map(LanguageCode::from))
            .output_s3_bucket_name(&request.bucket)
            .output_s3_key_prefix(&request.key_prefix)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    voice = %request.voice_id,
                    engine = %request.engine,
                    "AWS Polly start_speech_synthesis_task failed"
                );
                format!("AWS Polly error: {}", DisplayErrorContext(&e))
            })?;

        output
            .synthesis_task()
            .and_then(|task| task.task_id())
            .map(str::to_string)
            .ok_or_else(|| "AWS Polly accepted the task but returned no task id".to_string())
    }

    async fn poll_job(&self, job_id: &str) -> Result<RemoteJobStatus, String> {
        let output = self
            .polly_client
            .get_speech_synthesis_task()
            .task_id(job_id)
            .send()
            .await
            .map_err(|e| format!("AWS Polly error: {}", DisplayErrorContext(&e)))?;

        let task = output
            .synthesis_task()
            .ok_or_else(|| format!("AWS Polly returned no task for id {}", job_id))?;

        Ok(RemoteJobStatus {
            status: Self::map_status(task.task_status()),
            output_uri: task.output_uri().map(str::to_string),
            failure_reason: task.task_status_reason().map(str::to_string),
        })
    }
}
