use crate::domain::book::{Chapter, ChapterSplitter};
use crate::domain::tts::{
    AudioFormat, JobMonitor, JobSubmitter, MonitorSettings, SubmissionSettings, SynthesisReport,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use crate::infrastructure::output::OutputDirectory;
use crate::infrastructure::repositories::{BlobRepository, SynthesisRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Turns a text file into one audio file per chapter
pub struct AudiobookService {
    splitter: ChapterSplitter,
    submitter: JobSubmitter,
    monitor: JobMonitor,
    blob_repo: Arc<dyn BlobRepository>,
    bucket: String,
    output_dir: PathBuf,
    output_format: AudioFormat,
}

impl AudiobookService {
    pub fn new(
        config: &Config,
        synthesis_repo: Arc<dyn SynthesisRepository>,
        blob_repo: Arc<dyn BlobRepository>,
    ) -> AppResult<Self> {
        let splitter = ChapterSplitter::new(&config.heading_pattern)?;
        let submitter = JobSubmitter::new(synthesis_repo.clone(), SubmissionSettings::from(config));
        let monitor = JobMonitor::new(
            synthesis_repo,
            blob_repo.clone(),
            MonitorSettings::from(config),
        );

        Ok(Self {
            splitter,
            submitter,
            monitor,
            blob_repo,
            bucket: config.bucket.clone(),
            output_dir: config.output_dir.clone(),
            output_format: config.output_format,
        })
    }
}

#[async_trait]
pub trait AudiobookServiceApi: Send + Sync {
    /// Narrate a book file
    ///
    /// This operation:
    /// - Reads and splits the text into chapters
    /// - Verifies the storage bucket is reachable
    /// - Recreates the local output directory
    /// - Starts one synthesis task per chapter, then polls them all
    /// - Downloads finished audio and removes it from storage
    ///
    /// Only setup problems are returned as errors. Per-chapter failures are
    /// part of the report.
    async fn narrate_file(&self, text_file: &Path) -> AppResult<SynthesisReport>;

    /// Same as `narrate_file` for text already in memory
    async fn narrate(&self, text: &str) -> AppResult<SynthesisReport>;
}

#[async_trait]
impl AudiobookServiceApi for AudiobookService {
    async fn narrate_file(&self, text_file: &Path) -> AppResult<SynthesisReport> {
        tracing::info!(path = %text_file.display(), "Reading book text");
        let text = read_text(text_file).await?;
        self.narrate(&text).await
    }

    async fn narrate(&self, text: &str) -> AppResult<SynthesisReport> {
        // 1. Split into chapters
        let chapters = self.split(text)?;

        // 2. Make sure results will have somewhere to land
        self.check_storage().await?;

        // 3. Fresh output directory
        let mut output = OutputDirectory::recreate(&self.output_dir, self.output_format).await?;

        // 4. Fan out every task, then wait for all of them
        let jobs = self.submitter.submit_all(chapters).await;
        let report = self.monitor.monitor_and_retrieve(jobs, &mut output).await;

        tracing::info!(
            chapters_found = report.chapters_found,
            completed = report.completed.len(),
            failed = report.failed.len(),
            timed_out = report.timed_out.len(),
            downloads_succeeded = report.downloads_succeeded(),
            "Audiobook run finished"
        );

        Ok(report)
    }
}

impl AudiobookService {
    fn split(&self, text: &str) -> AppResult<Vec<Chapter>> {
        let chapters = self.splitter.split(text)?;
        for chapter in &chapters {
            tracing::info!(
                chapter_index = chapter.index,
                chapter_title = %chapter.title,
                body_length = chapter.body.chars().count(),
                "Found chapter"
            );
        }
        tracing::info!(
            chapter_count = chapters.len(),
            pattern = %self.splitter.pattern(),
            "Text split into chapters"
        );
        Ok(chapters)
    }

    async fn check_storage(&self) -> AppResult<()> {
        self.blob_repo
            .check_bucket(&self.bucket)
            .await
            .map_err(|reason| AppError::StorageUnreachable {
                bucket: self.bucket.clone(),
                reason,
            })?;
        tracing::info!(bucket = %self.bucket, "Storage bucket reachable");
        Ok(())
    }
}

/// Read a UTF-8 text file, dropping a leading byte order mark
async fn read_text(path: &Path) -> AppResult<String> {
    let bytes = tokio::fs::read(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::InputNotFound(path.to_path_buf())
        } else {
            AppError::InputUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let text = String::from_utf8(bytes).map_err(|e| AppError::InputUnreadable {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}
