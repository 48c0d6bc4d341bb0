pub mod error;
pub mod model;
pub mod splitter;

pub use error::BookError;
pub use model::Chapter;
pub use splitter::ChapterSplitter;
