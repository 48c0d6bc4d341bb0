use polly_audiobook::domain::audiobook::AudiobookService;
use polly_audiobook::domain::tts::{AudioFormat, EngineTier};
use polly_audiobook::infrastructure::config::{Config, LogFormat, ReportFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub mod aws_mocks;

use fakes::{FakeBlobRepository, FakeSynthesisRepository};

pub const HEADING_PATTERN: &str = r"Глава \d+";

pub fn test_config(output_dir: &Path, poll_interval: Duration, max_wait: Duration) -> Config {
    Config {
        text_file: output_dir.with_extension("txt"),
        aws_region: "us-east-1".to_string(),
        aws_endpoint_url: None,
        bucket: "books".to_string(),
        key_prefix: "polly-output/".to_string(),
        voice_id: "Maxim".to_string(),
        output_format: AudioFormat::Mp3,
        engine: EngineTier::Standard,
        language_code: Some("ru-RU".to_string()),
        heading_pattern: HEADING_PATTERN.to_string(),
        poll_interval,
        max_wait,
        output_dir: output_dir.to_path_buf(),
        log_format: LogFormat::Pretty,
        report_format: ReportFormat::Text,
    }
}

/// A service wired to fakes, writing into a scratch directory
pub struct TestContext {
    pub service: AudiobookService,
    pub synthesis: Arc<FakeSynthesisRepository>,
    pub blobs: Arc<FakeBlobRepository>,
    pub config: Config,
    _root: TempDir,
}

impl TestContext {
    pub fn new(synthesis: FakeSynthesisRepository, blobs: FakeBlobRepository) -> Self {
        Self::with_timing(synthesis, blobs, Duration::from_secs(1), Duration::from_secs(60))
    }

    pub fn with_timing(
        synthesis: FakeSynthesisRepository,
        blobs: FakeBlobRepository,
        poll_interval: Duration,
        max_wait: Duration,
    ) -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&root.path().join("book"), poll_interval, max_wait);

        let synthesis = Arc::new(synthesis);
        let blobs = Arc::new(blobs);
        let service = AudiobookService::new(&config, synthesis.clone(), blobs.clone())
            .expect("Failed to create service");

        Self {
            service,
            synthesis,
            blobs,
            config,
            _root: root,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    pub fn output_file(&self, title: &str) -> PathBuf {
        self.config.output_dir.join(format!("{}.mp3", title))
    }

    /// Names of the files in the output directory, sorted
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.config.output_dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

/// A book with `n` chapters and some front matter
pub fn book_with_chapters(n: usize) -> String {
    let mut text = String::from("Лев Толстой\nВступление\n\n");
    for i in 1..=n {
        text.push_str(&format!("Глава {}\nТекст главы {}.\n\n", i, i));
    }
    text
}
