//! Error types for the quizload-core library.

use thiserror::Error;

use crate::models::question::Category;

/// Main error type for the quizload library.
#[derive(Error, Debug)]
pub enum QuizloadError {
    /// Persistence error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Bundle reading error.
    #[error("bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the persistence layer.
///
/// Any of these aborts the running batch; nothing of it is committed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite rejected a statement or the connection failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Options could not be encoded or decoded.
    #[error("options encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A row with the same code already exists in this category.
    #[error("duplicate question {code} in category {category}")]
    Duplicate { code: String, category: Category },

    /// A stored value could not be mapped back to the model.
    #[error("invalid stored value for {field}: {value}")]
    InvalidRow { field: String, value: String },

    /// The backend refused a write.
    #[error("write rejected: {0}")]
    WriteRejected(String),
}

/// Errors related to reading question bundles.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The bundle path does not exist.
    #[error("bundle not found: {0}")]
    NotFound(String),

    /// Failed to read a file or directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to open or read a zip archive.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A member is not valid UTF-8.
    #[error("member {name} is not valid UTF-8")]
    Utf8 { name: String },
}

/// Reasons a structurally complete record is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The identifying code is empty.
    #[error("empty code")]
    EmptyCode,

    /// The record has no alternatives.
    #[error("missing option set")]
    MissingOptions,

    /// An alternative label is outside the grammar's alphabet.
    #[error("label {label:?} is not allowed for {category} questions")]
    UnexpectedLabel { label: String, category: Category },

    /// The answer names a label that no alternative carries.
    #[error("answer {label:?} does not reference any of the options {available:?}")]
    DanglingAnswer { label: String, available: Vec<String> },

    /// The answer only matches an alternative when letter case is ignored.
    #[error("answer {answer:?} differs from option label {option:?} only by case")]
    LabelCaseMismatch { answer: String, option: String },
}

/// Result type for the quizload library.
pub type Result<T> = std::result::Result<T, QuizloadError>;
