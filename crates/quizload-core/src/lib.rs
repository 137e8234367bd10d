//! Core library for exam question ingestion.
//!
//! This crate provides:
//! - Fixed-choice and variable-choice grammar extraction from plain text
//! - Structural validation of candidate question records
//! - Atomic batch persistence to SQLite (or an in-memory store)
//! - Bundle reading from directories and zip archives

pub mod error;
pub mod models;
pub mod grammar;
pub mod validate;
pub mod store;
pub mod loader;
pub mod bundle;
pub mod pipeline;

pub use error::{QuizloadError, Result, StoreError, BundleError, ValidationError};
pub use models::question::{Category, Options, QuestionRecord, StoredQuestion};
pub use models::config::{QuizloadConfig, StoreConfig, ExtractionConfig};
pub use grammar::{
    Extraction, FixedChoiceExtractor, GrammarExtractor, GrammarMismatch, MismatchReason,
    VariableChoiceExtractor,
};
pub use validate::{RecordValidator, Rejection, ValidationReport};
pub use store::{DuplicatePolicy, MemoryStore, QuestionStore, SqliteStore, StoreTransaction, WriteOutcome};
pub use loader::{LoadSummary, Loader};
pub use bundle::{read_bundle, SourceText};
pub use pipeline::{IngestReport, Pipeline, SourceMismatch};
