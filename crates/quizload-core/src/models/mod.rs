//! Data models for question records and configuration.

pub mod config;
pub mod question;

pub use config::{ExtractionConfig, QuizloadConfig, StoreConfig};
pub use question::{Category, Options, QuestionRecord, StoredQuestion};
