use serde::{Deserialize, Serialize};

/// A titled, contiguous span of the book narrated as one audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based position in the document
    pub index: usize,
    pub title: String,
    pub body: String,
}

impl Chapter {
    pub fn new(index: usize, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            body: body.into(),
        }
    }
}
