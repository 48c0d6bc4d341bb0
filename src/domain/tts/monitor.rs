use super::locator::BlobLocator;
use super::model::{JobState, RemoteTaskStatus, SynthesisJob};
use super::report::SynthesisReport;
use crate::infrastructure::config::Config;
use crate::infrastructure::output::OutputDirectory;
use crate::infrastructure::repositories::{BlobRepository, SynthesisRepository};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub max_wait: Duration,
    /// Bucket the tasks were pointed at
    pub bucket: String,
}

impl From<&Config> for MonitorSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval,
            max_wait: config.max_wait,
            bucket: config.bucket.clone(),
        }
    }
}

impl MonitorSettings {
    /// Upper bound on polling passes for the wait budget
    pub fn max_passes(&self) -> u64 {
        let interval = self.poll_interval.as_millis().max(1);
        (self.max_wait.as_millis() / interval) as u64 + 1
    }
}

/// Polls submitted jobs until they finish, then pulls each result down and
/// removes it from storage.
pub struct JobMonitor {
    synthesis_repo: Arc<dyn SynthesisRepository>,
    blob_repo: Arc<dyn BlobRepository>,
    settings: MonitorSettings,
}

impl JobMonitor {
    pub fn new(
        synthesis_repo: Arc<dyn SynthesisRepository>,
        blob_repo: Arc<dyn BlobRepository>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            synthesis_repo,
            blob_repo,
            settings,
        }
    }

    /// Drive every job to a terminal state and retrieve completed audio.
    ///
    /// Jobs still running when the wait budget runs out end as `TimedOut`;
    /// the remote task is left alone.
    pub async fn monitor_and_retrieve(
        &self,
        mut jobs: Vec<SynthesisJob>,
        output: &mut OutputDirectory,
    ) -> SynthesisReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let max_passes = self.settings.max_passes();

        // File names follow document order, not completion order
        jobs.sort_by_key(|job| job.chapter.index);
        let targets: Vec<PathBuf> = jobs
            .iter()
            .map(|job| output.file_for(&job.chapter))
            .collect();

        tracing::info!(
            pending = jobs.iter().filter(|job| job.is_pending()).count(),
            poll_interval_secs = self.settings.poll_interval.as_secs_f64(),
            max_wait_secs = self.settings.max_wait.as_secs_f64(),
            max_passes = max_passes,
            "Waiting for synthesis tasks to complete"
        );

        for pass in 1..=max_passes {
            let pending = jobs.iter().filter(|job| job.is_pending()).count();
            if pending == 0 {
                break;
            }

            tracing::info!(
                pass = pass,
                pending = pending,
                elapsed_secs = start.elapsed().as_secs(),
                "Checking status of remaining tasks"
            );

            for (job, target) in jobs
                .iter_mut()
                .zip(&targets)
                .filter(|(job, _)| job.is_pending())
            {
                self.poll_once(job, target).await;
            }

            if jobs.iter().all(|job| !job.is_pending()) {
                break;
            }
            if pass == max_passes || start.elapsed() >= self.settings.max_wait {
                break;
            }

            tokio::time::sleep(self.settings.poll_interval).await;
        }

        for job in jobs.iter_mut().filter(|job| job.is_pending()) {
            tracing::warn!(
                chapter_index = job.chapter.index,
                chapter_title = %job.chapter.title,
                job_id = ?job.job_id,
                waited_secs = start.elapsed().as_secs(),
                "Gave up waiting for synthesis task"
            );
            job.state = JobState::TimedOut;
        }

        SynthesisReport::from_jobs(&jobs, output.path(), started_at, Utc::now())
    }

    async fn poll_once(&self, job: &mut SynthesisJob, target: &Path) {
        let Some(job_id) = job.job_id.clone() else {
            job.state = JobState::Failed;
            job.error.get_or_insert_with(|| "task was never started".to_string());
            return;
        };

        let status = match self.synthesis_repo.poll_job(&job_id).await {
            Ok(status) => status,
            Err(e) => {
                // Transient: keep polling until the budget runs out
                tracing::warn!(
                    chapter_title = %job.chapter.title,
                    job_id = %job_id,
                    error = %e,
                    "Error checking task status, retrying"
                );
                job.error = Some(format!("status check failed: {}", e));
                return;
            }
        };

        match status.status {
            RemoteTaskStatus::Scheduled | RemoteTaskStatus::InProgress => {
                job.state = JobState::InProgress;
                job.error = None;
            }
            RemoteTaskStatus::Failed => {
                let reason = status
                    .failure_reason
                    .unwrap_or_else(|| "unknown reason".to_string());
                tracing::error!(
                    chapter_title = %job.chapter.title,
                    job_id = %job_id,
                    reason = %reason,
                    "Synthesis task failed"
                );
                job.state = JobState::Failed;
                job.error = Some(reason);
            }
            RemoteTaskStatus::Completed => match status.output_uri {
                Some(uri) => {
                    tracing::info!(
                        chapter_title = %job.chapter.title,
                        job_id = %job_id,
                        output_uri = %uri,
                        "Synthesis task completed"
                    );
                    job.state = JobState::Completed;
                    job.error = None;
                    self.retrieve(job, &uri, target).await;
                }
                None => {
                    tracing::error!(
                        chapter_title = %job.chapter.title,
                        job_id = %job_id,
                        "Task completed but output location is missing"
                    );
                    job.state = JobState::Failed;
                    job.error = Some("completed but output location missing".to_string());
                }
            },
            RemoteTaskStatus::Unknown(other) => {
                tracing::warn!(
                    chapter_title = %job.chapter.title,
                    job_id = %job_id,
                    status = %other,
                    "Unknown task status, will check again"
                );
            }
        }
    }

    /// Download a completed job's audio to `local_path`, then delete the
    /// remote copy. The remote copy stays whenever the local file could not
    /// be written.
    async fn retrieve(&self, job: &mut SynthesisJob, output_uri: &str, local_path: &Path) {
        let locator = match BlobLocator::parse(output_uri) {
            Ok(locator) => locator,
            Err(e) => {
                tracing::error!(
                    chapter_title = %job.chapter.title,
                    output_uri = %output_uri,
                    error = %e,
                    "Could not parse output location"
                );
                job.error = Some(format!("unrecognized output location: {}", e));
                return;
            }
        };

        if locator.bucket != self.settings.bucket {
            tracing::warn!(
                configured_bucket = %self.settings.bucket,
                reported_bucket = %locator.bucket,
                "Service reported a different bucket, using the reported one"
            );
        }
        job.output_locator = Some(locator.clone());

        let part_path = partial_path(local_path);

        let downloaded = match self.blob_repo.download(&locator, &part_path).await {
            Ok(bytes) => tokio::fs::rename(&part_path, local_path)
                .await
                .map(|_| bytes)
                .map_err(|e| format!("failed to move download into place: {}", e)),
            Err(e) => Err(format!("download failed: {}", e)),
        };

        let bytes = match downloaded {
            Ok(bytes) => bytes,
            Err(e) => {
                remove_partial(&part_path).await;
                tracing::error!(
                    chapter_title = %job.chapter.title,
                    locator = %locator,
                    error = %e,
                    "Download failed, leaving object in storage"
                );
                job.error = Some(e);
                return;
            }
        };

        tracing::info!(
            chapter_title = %job.chapter.title,
            path = %local_path.display(),
            audio_size_bytes = bytes,
            "Audio downloaded"
        );
        job.local_path = Some(local_path.to_path_buf());

        match self.blob_repo.delete(&locator).await {
            Ok(()) => {
                tracing::debug!(locator = %locator, "Deleted object from storage");
                job.blob_deleted = true;
            }
            Err(e) => {
                tracing::warn!(
                    chapter_title = %job.chapter.title,
                    locator = %locator,
                    error = %e,
                    "Failed to delete object, it remains in storage"
                );
                job.deletion_error = Some(e);
            }
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial download");
        }
    }
}
