pub mod audiobook;
pub mod book;
pub mod tts;
