//! Error types for the NutriScan library.
//!
//! All fallible operations return [`Result`], an alias over
//! [`NutriScanError`]. Failures internal to one sub-analysis (diet or
//! health) are downgraded by the orchestrator and never abort a whole
//! analysis call; only data-integrity failures at training or artifact
//! load time are surfaced as hard errors.
//!
//! # Examples
//!
//! ```
//! use nutriscan::error::{NutriScanError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NutriScanError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for NutriScan operations.
#[derive(Error, Debug)]
pub enum NutriScanError {
    /// I/O errors (artifact files, dataset files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Prediction attempted before training or loading a model.
    #[error("Model not trained: {message}")]
    ModelNotTrained { message: String },

    /// Too few usable rows remained after cleaning the reference dataset.
    #[error("Training data insufficient: need at least {min_rows} rows, got {actual}")]
    InsufficientTrainingData { min_rows: usize, actual: usize },

    /// Saved model/scaler artifact is missing, truncated, or inconsistent.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Reference dataset could not be parsed.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Keyword matching / text analysis errors.
    #[error("Classification error: {0}")]
    Classification(String),

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary artifact serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic wrapped error.
    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`NutriScanError`].
pub type Result<T> = std::result::Result<T, NutriScanError>;

impl NutriScanError {
    /// Create a new artifact error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        NutriScanError::Artifact(msg.into())
    }

    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        NutriScanError::Dataset(msg.into())
    }

    /// Create a new classification error.
    pub fn classification<S: Into<String>>(msg: S) -> Self {
        NutriScanError::Classification(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        NutriScanError::InvalidArgument(msg.into())
    }

    /// Create a new model-not-trained error.
    pub fn not_trained<S: Into<String>>(msg: S) -> Self {
        NutriScanError::ModelNotTrained {
            message: msg.into(),
        }
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        NutriScanError::Serialization(msg.into())
    }
}
