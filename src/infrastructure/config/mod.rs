use crate::domain::book::splitter::DEFAULT_HEADING_PATTERN;
use crate::domain::tts::{AudioFormat, EngineTier};
use crate::error::AppError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const PLACEHOLDER_BUCKET: &str = "YOUR-BUCKET-NAME-HERE";

#[derive(Debug, Clone)]
pub struct Config {
    pub text_file: PathBuf,
    pub aws_region: String,
    pub aws_endpoint_url: Option<String>,
    pub bucket: String,
    /// Always empty or ending with `/`
    pub key_prefix: String,
    pub voice_id: String,
    pub output_format: AudioFormat,
    pub engine: EngineTier,
    pub language_code: Option<String>,
    pub heading_pattern: String,
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub output_dir: PathBuf,
    pub log_format: LogFormat,
    pub report_format: ReportFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let require = |key: &str| get(key).ok_or_else(|| AppError::Config(format!("{} is not set", key)));

        let text_file = PathBuf::from(require("TEXT_FILE")?);

        let bucket = require("S3_BUCKET_NAME")?;
        if bucket == PLACEHOLDER_BUCKET {
            return Err(AppError::Config(
                "S3_BUCKET_NAME still holds the placeholder value".to_string(),
            ));
        }

        let poll_interval_secs: u64 = parse_number(&get_or("POLL_INTERVAL_SECONDS", "10"), "POLL_INTERVAL_SECONDS")?;
        if poll_interval_secs == 0 {
            return Err(AppError::Config(
                "POLL_INTERVAL_SECONDS must be greater than zero".to_string(),
            ));
        }
        let max_wait_minutes: u64 = parse_number(&get_or("MAX_WAIT_MINUTES", "30"), "MAX_WAIT_MINUTES")?;
        let max_wait_secs = max_wait_minutes.checked_mul(60).ok_or_else(|| {
            AppError::Config(format!("MAX_WAIT_MINUTES is too large: {}", max_wait_minutes))
        })?;

        let output_dir = match get("OUTPUT_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_output_dir(&text_file)?,
        };

        let config = Config {
            aws_region: get_or("AWS_REGION", "eu-west-1"),
            aws_endpoint_url: get("AWS_ENDPOINT_URL"),
            bucket,
            key_prefix: normalize_prefix(&get_or("S3_OUTPUT_PREFIX", "polly-output/book-chapters/")),
            voice_id: get_or("POLLY_VOICE_ID", "Maxim"),
            output_format: get_or("POLLY_OUTPUT_FORMAT", "mp3")
                .parse()
                .map_err(AppError::Config)?,
            engine: get_or("POLLY_ENGINE", "standard")
                .parse()
                .map_err(AppError::Config)?,
            language_code: get("POLLY_LANGUAGE_CODE"),
            heading_pattern: get_or("CHAPTER_HEADING_PATTERN", DEFAULT_HEADING_PATTERN),
            poll_interval: Duration::from_secs(poll_interval_secs),
            max_wait: Duration::from_secs(max_wait_secs),
            output_dir,
            log_format: match get_or("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            report_format: match get_or("REPORT_FORMAT", "text").to_lowercase().as_str() {
                "json" => ReportFormat::Json,
                _ => ReportFormat::Text,
            },
            text_file,
        };

        Ok(config)
    }
}

fn parse_number(value: &str, key: &str) -> Result<u64, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a whole number, got '{}'", key, value)))
}

/// Key prefixes are directories: make sure a non-empty one ends with `/`
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    }
}

/// The input file name without its extension, next to the input file
fn default_output_dir(text_file: &Path) -> Result<PathBuf, AppError> {
    let stem = text_file.file_stem().ok_or_else(|| {
        AppError::Config(format!(
            "cannot derive an output directory from '{}'",
            text_file.display()
        ))
    })?;
    Ok(text_file.with_file_name(stem))
}
