use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("input text is empty")]
    EmptyText,
    #[error("invalid heading pattern: {0}")]
    InvalidPattern(String),
    #[error("no chapters found matching '{0}'")]
    NoChapters(String),
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::EmptyText => AppError::EmptyInput,
            BookError::InvalidPattern(msg) => AppError::InvalidHeadingPattern(msg),
            BookError::NoChapters(pattern) => AppError::NoChaptersFound(pattern),
        }
    }
}
