use std::path::PathBuf;

/// Setup errors. Any of these stops the process before a single synthesis
/// task is started.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input text file not found at '{}'", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read input text file '{}': {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input text is empty")]
    EmptyInput,

    #[error("Invalid chapter heading pattern: {0}")]
    InvalidHeadingPattern(String),

    #[error("No chapters found matching the pattern '{0}' - check heading pattern")]
    NoChaptersFound(String),

    #[error("Storage bucket '{bucket}' is unreachable: {reason}")]
    StorageUnreachable { bucket: String, reason: String },

    #[error("Failed to prepare output directory '{}': {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
