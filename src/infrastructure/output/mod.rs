use crate::domain::book::Chapter;
use crate::domain::tts::AudioFormat;
use crate::error::{AppError, AppResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Local directory receiving the chapter audio files.
///
/// Recreated on every run so it only ever holds this run's output.
#[derive(Debug)]
pub struct OutputDirectory {
    path: PathBuf,
    format: AudioFormat,
    taken: HashSet<String>,
}

impl OutputDirectory {
    /// Remove any previous contents and create the directory
    pub async fn recreate(path: impl Into<PathBuf>, format: AudioFormat) -> AppResult<Self> {
        let path = path.into();
        let to_app_error = |source| AppError::OutputDirectory {
            path: path.clone(),
            source,
        };

        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed existing output directory");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(to_app_error(e)),
        }

        tokio::fs::create_dir_all(&path).await.map_err(to_app_error)?;
        tracing::info!(path = %path.display(), "Output directory ready");

        Ok(Self {
            path,
            format,
            taken: HashSet::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reserve `<title>.<extension>` for a chapter.
    ///
    /// A title seen before gets its chapter index appended.
    pub fn file_for(&mut self, chapter: &Chapter) -> PathBuf {
        let base = sanitize_file_stem(&chapter.title);
        let mut stem = base.clone();
        if !self.taken.insert(stem.to_lowercase()) {
            stem = format!("{} ({})", base, chapter.index);
            self.taken.insert(stem.to_lowercase());
        }
        self.path.join(format!("{}.{}", stem, self.format.extension()))
    }
}

/// Replace characters that cannot appear in a file name
pub fn sanitize_file_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').to_string();

    if cleaned.is_empty() {
        "chapter".to_string()
    } else {
        cleaned
    }
}
