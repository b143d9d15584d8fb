//! Error types for row reconstruction.
//!
//! Malformed rows are not errors: they are quarantined and repaired by the
//! pipeline itself. The variants below cover caller mistakes (a pass started
//! on a dirty buffer, an invalid schema) and failures of the external
//! collaborators (extractors and sinks).

use thiserror::Error;

/// Error type for fixrow operations
#[derive(Error, Debug)]
pub enum FixrowError {
    /// A document pass was started while fragments of a previous document
    /// were still buffered.
    ///
    /// This is a caller error. Finish or reset the previous pass first;
    /// mixing fragments of two documents would corrupt both.
    #[error("Fragment buffer not empty: {pending} fragment(s) left from a previous document")]
    BufferNotEmpty {
        /// Number of fragments still in the buffer
        pending: usize,
    },

    /// The column schema violates one of its invariants
    /// (unique names, unique signatures, exactly one terminator, ...).
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// The document text extractor failed.
    #[error("Extraction failed for {locator}: {reason}")]
    Extraction {
        /// Document locator (usually a file path)
        locator: String,
        /// What went wrong
        reason: String,
    },

    /// The tabular sink failed to persist records.
    #[error("Sink error: {0}")]
    Sink(String),

    /// A composite key references a column that is not in the schema.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// I/O error while reading fragments or writing output.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error for fragment dumps.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FixrowError {
    /// Build an [`FixrowError::Extraction`] from any displayable reason
    #[inline]
    #[must_use = "returns the error, it does not raise it"]
    pub fn extraction(locator: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Extraction {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }
}

/// Type alias for [`Result<T, FixrowError>`].
pub type Result<T> = std::result::Result<T, FixrowError>;
