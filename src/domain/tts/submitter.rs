use super::markup;
use super::model::{AudioFormat, EngineTier, SynthesisJob, SynthesisRequest};
use crate::domain::book::Chapter;
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::SynthesisRepository;
use std::sync::Arc;

/// Where and how every chapter is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSettings {
    pub voice_id: String,
    pub output_format: AudioFormat,
    pub engine: EngineTier,
    pub language_code: Option<String>,
    pub bucket: String,
    pub key_prefix: String,
}

impl From<&Config> for SubmissionSettings {
    fn from(config: &Config) -> Self {
        Self {
            voice_id: config.voice_id.clone(),
            output_format: config.output_format,
            engine: config.engine,
            language_code: config.language_code.clone(),
            bucket: config.bucket.clone(),
            key_prefix: config.key_prefix.clone(),
        }
    }
}

pub struct JobSubmitter {
    synthesis_repo: Arc<dyn SynthesisRepository>,
    settings: SubmissionSettings,
}

impl JobSubmitter {
    pub fn new(synthesis_repo: Arc<dyn SynthesisRepository>, settings: SubmissionSettings) -> Self {
        Self {
            synthesis_repo,
            settings,
        }
    }

    /// Start one job for one chapter. Never fails: a rejected submission is
    /// returned as a failed job.
    pub async fn submit(&self, chapter: Chapter) -> SynthesisJob {
        let request = SynthesisRequest {
            ssml: markup::build(&chapter.title, &chapter.body),
            voice_id: self.settings.voice_id.clone(),
            output_format: self.settings.output_format,
            engine: self.settings.engine,
            language_code: self.settings.language_code.clone(),
            bucket: self.settings.bucket.clone(),
            key_prefix: self.settings.key_prefix.clone(),
        };

        match self.synthesis_repo.begin_job(&request).await {
            Ok(job_id) => {
                tracing::info!(
                    chapter_index = chapter.index,
                    chapter_title = %chapter.title,
                    job_id = %job_id,
                    "Synthesis task started"
                );
                SynthesisJob::submitted(chapter, job_id)
            }
            Err(e) => {
                tracing::error!(
                    chapter_index = chapter.index,
                    chapter_title = %chapter.title,
                    error = %e,
                    "Failed to start synthesis task"
                );
                SynthesisJob::rejected(chapter, e)
            }
        }
    }

    /// Submit every chapter before anything is polled
    pub async fn submit_all(&self, chapters: Vec<Chapter>) -> Vec<SynthesisJob> {
        tracing::info!(
            chapter_count = chapters.len(),
            voice = %self.settings.voice_id,
            engine = %self.settings.engine,
            output_prefix = %format!("s3://{}/{}", self.settings.bucket, self.settings.key_prefix),
            "Starting asynchronous synthesis tasks"
        );

        let mut jobs = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            jobs.push(self.submit(chapter).await);
        }

        let started = jobs.iter().filter(|job| job.job_id.is_some()).count();
        if started < jobs.len() {
            tracing::warn!(
                started = started,
                rejected = jobs.len() - started,
                "Some synthesis tasks could not be started"
            );
        }

        jobs
    }
}
