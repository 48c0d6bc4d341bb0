use super::model::{JobState, SynthesisJob};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of a single chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub chapter_index: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobOutcome {
    fn from_job(job: &SynthesisJob, error: Option<&String>) -> Self {
        Self {
            chapter_index: job.chapter.index,
            title: job.chapter.title.clone(),
            job_id: job.job_id.clone(),
            local_path: job.local_path.clone(),
            error: error.cloned(),
        }
    }
}

/// Final summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub output_dir: PathBuf,
    pub chapters_found: usize,
    /// Tasks the service accepted
    pub tasks_started: usize,
    pub completed: Vec<JobOutcome>,
    pub failed: Vec<JobOutcome>,
    pub timed_out: Vec<JobOutcome>,
    /// Completed remotely, but the audio is not on disk
    pub download_errors: Vec<JobOutcome>,
    /// On disk, but the remote object could not be removed
    pub deletion_errors: Vec<JobOutcome>,
    pub deletions_succeeded: usize,
}

impl SynthesisReport {
    pub fn from_jobs(
        jobs: &[SynthesisJob],
        output_dir: &Path,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut report = Self {
            started_at,
            finished_at,
            output_dir: output_dir.to_path_buf(),
            chapters_found: jobs.len(),
            tasks_started: jobs.iter().filter(|job| job.job_id.is_some()).count(),
            completed: Vec::new(),
            failed: Vec::new(),
            timed_out: Vec::new(),
            download_errors: Vec::new(),
            deletion_errors: Vec::new(),
            deletions_succeeded: 0,
        };

        let mut ordered: Vec<&SynthesisJob> = jobs.iter().collect();
        ordered.sort_by_key(|job| job.chapter.index);

        for job in ordered {
            let outcome = JobOutcome::from_job(job, job.error.as_ref());
            match job.state {
                JobState::Completed => {
                    if job.has_retrieval_error() {
                        report.download_errors.push(outcome.clone());
                    }
                    if job.deletion_error.is_some() {
                        report
                            .deletion_errors
                            .push(JobOutcome::from_job(job, job.deletion_error.as_ref()));
                    }
                    if job.blob_deleted {
                        report.deletions_succeeded += 1;
                    }
                    report.completed.push(outcome);
                }
                JobState::Failed => report.failed.push(outcome),
                JobState::TimedOut => report.timed_out.push(outcome),
                // Not reachable once monitoring has finished
                JobState::Submitted | JobState::InProgress => report.timed_out.push(outcome),
            }
        }

        report
    }

    pub fn downloads_succeeded(&self) -> usize {
        self.completed.len() - self.download_errors.len()
    }

    /// Every chapter is on disk
    pub fn is_complete(&self) -> bool {
        self.chapters_found > 0 && self.downloads_succeeded() == self.chapters_found
    }
}

fn write_outcomes(f: &mut fmt::Formatter<'_>, heading: &str, outcomes: &[JobOutcome]) -> fmt::Result {
    if outcomes.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{}:", heading)?;
    for outcome in outcomes {
        write!(f, "  - [{}] {}", outcome.chapter_index, outcome.title)?;
        if let Some(job_id) = &outcome.job_id {
            write!(f, " (TaskId: {})", job_id)?;
        }
        if let Some(error) = &outcome.error {
            write!(f, ": {}", error)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for SynthesisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary ---")?;
        writeln!(f, "Output directory:        '{}'", self.output_dir.display())?;
        writeln!(f, "Chapters found:          {}", self.chapters_found)?;
        writeln!(f, "Tasks started:           {}", self.tasks_started)?;
        writeln!(f, "Tasks completed:         {}", self.completed.len())?;
        writeln!(f, "Tasks failed:            {}", self.failed.len())?;
        writeln!(f, "Tasks timed out:         {}", self.timed_out.len())?;
        writeln!(f, "Downloads successful:    {}", self.downloads_succeeded())?;
        writeln!(f, "Download errors:         {}", self.download_errors.len())?;
        writeln!(f, "Deletions successful:    {}", self.deletions_succeeded)?;
        writeln!(f, "Deletion errors:         {}", self.deletion_errors.len())?;
        writeln!(
            f,
            "Elapsed:                 {}s",
            (self.finished_at - self.started_at).num_seconds()
        )?;

        write_outcomes(f, "Failed tasks", &self.failed)?;
        write_outcomes(f, "Timed out tasks (may still be running remotely)", &self.timed_out)?;
        write_outcomes(f, "Download errors (object left in storage)", &self.download_errors)?;
        write_outcomes(f, "Deletion errors (object remains in storage)", &self.deletion_errors)
    }
}
