use super::error::BookError;
use super::model::Chapter;
use regex::Regex;

/// Default heading: the Russian "Глава <number>" marker
pub const DEFAULT_HEADING_PATTERN: &str = r"Глава\s+\d+";

/// Splits a book into chapters on a heading pattern.
///
/// Every match of the pattern opens a new chapter. Text before the first
/// heading is front matter and is dropped.
#[derive(Debug, Clone)]
pub struct ChapterSplitter {
    pattern: Regex,
}

impl ChapterSplitter {
    pub fn new(pattern: &str) -> Result<Self, BookError> {
        let pattern = Regex::new(pattern).map_err(|e| BookError::InvalidPattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn split(&self, text: &str) -> Result<Vec<Chapter>, BookError> {
        split(text, &self.pattern)
    }
}

/// Split `text` into chapters, in document order, indexed from 1
pub fn split(text: &str, pattern: &Regex) -> Result<Vec<Chapter>, BookError> {
    if text.trim().is_empty() {
        return Err(BookError::EmptyText);
    }

    // Zero-width matches cannot delimit anything
    let headings: Vec<_> = pattern.find_iter(text).filter(|m| !m.is_empty()).collect();

    if headings.is_empty() {
        return Err(BookError::NoChapters(pattern.as_str().to_string()));
    }

    let chapters = headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let body_end = headings
                .get(i + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            Chapter::new(
                i + 1,
                heading.as_str().trim(),
                text[heading.end()..body_end].trim(),
            )
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        chapter_count = chapters.len(),
        front_matter_length = headings[0].start(),
        "Text split into chapters"
    );

    Ok(chapters)
}
