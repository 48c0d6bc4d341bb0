pub mod service;

pub use service::{AudiobookService, AudiobookServiceApi};
