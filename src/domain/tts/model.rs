use super::locator::BlobLocator;
use crate::domain::book::Chapter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Audio container requested from the synthesis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    #[serde(rename = "mp3")]
    Mp3,
    #[serde(rename = "ogg_vorbis")]
    OggVorbis,
    #[serde(rename = "pcm")]
    Pcm,
}

impl AudioFormat {
    /// Name understood by the synthesis service
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::OggVorbis => "ogg_vorbis",
            AudioFormat::Pcm => "pcm",
        }
    }

    /// Extension of the downloaded file
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::OggVorbis => "ogg",
            AudioFormat::Pcm => "pcm",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "ogg_vorbis" | "ogg" => Ok(AudioFormat::OggVorbis),
            "pcm" => Ok(AudioFormat::Pcm),
            other => Err(format!(
                "unsupported output format '{}' (expected mp3, ogg_vorbis or pcm)",
                other
            )),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synthesis engine tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineTier {
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "neural")]
    Neural,
    #[serde(rename = "long-form")]
    LongForm,
    #[serde(rename = "generative")]
    Generative,
}

impl EngineTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineTier::Standard => "standard",
            EngineTier::Neural => "neural",
            EngineTier::LongForm => "long-form",
            EngineTier::Generative => "generative",
        }
    }
}

impl FromStr for EngineTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(EngineTier::Standard),
            "neural" => Ok(EngineTier::Neural),
            "long-form" => Ok(EngineTier::LongForm),
            "generative" => Ok(EngineTier::Generative),
            other => Err(format!(
                "unsupported engine '{}' (expected standard, neural, long-form or generative)",
                other
            )),
        }
    }
}

impl std::fmt::Display for EngineTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Local view of a synthesis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Submitted,
    InProgress,
    Completed,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::TimedOut
        )
    }
}

/// Task status as reported by the synthesis service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTaskStatus {
    Scheduled,
    InProgress,
    Completed,
    Failed,
    Unknown(String),
}

/// Result of one status poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteJobStatus {
    pub status: RemoteTaskStatus,
    pub output_uri: Option<String>,
    pub failure_reason: Option<String>,
}

impl RemoteJobStatus {
    pub fn in_progress() -> Self {
        Self {
            status: RemoteTaskStatus::InProgress,
            output_uri: None,
            failure_reason: None,
        }
    }

    pub fn completed(output_uri: impl Into<String>) -> Self {
        Self {
            status: RemoteTaskStatus::Completed,
            output_uri: Some(output_uri.into()),
            failure_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: RemoteTaskStatus::Failed,
            output_uri: None,
            failure_reason: Some(reason.into()),
        }
    }
}

/// Everything the service needs to start rendering one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub ssml: String,
    pub voice_id: String,
    pub output_format: AudioFormat,
    pub engine: EngineTier,
    pub language_code: Option<String>,
    pub bucket: String,
    pub key_prefix: String,
}

/// One chapter's synthesis job, from submission to retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisJob {
    pub chapter: Chapter,
    /// `None` when the service never accepted the job
    pub job_id: Option<String>,
    pub output_locator: Option<BlobLocator>,
    pub state: JobState,
    pub error: Option<String>,
    pub local_path: Option<PathBuf>,
    pub blob_deleted: bool,
    pub deletion_error: Option<String>,
}

impl SynthesisJob {
    pub fn submitted(chapter: Chapter, job_id: impl Into<String>) -> Self {
        Self {
            chapter,
            job_id: Some(job_id.into()),
            output_locator: None,
            state: JobState::Submitted,
            error: None,
            local_path: None,
            blob_deleted: false,
            deletion_error: None,
        }
    }

    pub fn rejected(chapter: Chapter, error: impl Into<String>) -> Self {
        Self {
            chapter,
            job_id: None,
            output_locator: None,
            state: JobState::Failed,
            error: Some(error.into()),
            local_path: None,
            blob_deleted: false,
            deletion_error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Completed remotely but the audio never made it to disk
    pub fn has_retrieval_error(&self) -> bool {
        self.state == JobState::Completed && self.local_path.is_none()
    }
}
