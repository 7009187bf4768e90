//! Error types for the overlay pipeline.

use std::fmt;

/// Fatal error types for the placeholder-to-form-field pipeline.
///
/// The pipeline has no partial-success mode: every variant except the
/// page-range guard aborts the whole run when it reaches the CLI boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// The source document could not be parsed as a PDF.
    Parse(String),
    /// I/O error reading the source or writing the output.
    Io(String),
    /// The source document is encrypted and cannot be processed.
    PasswordRequired,
    /// A page index was requested past the end of a document.
    ///
    /// In the merged-composition path this is caught to stop assembly
    /// early; everywhere else it indicates a caller bug.
    PageOutOfRange {
        /// The 0-based index that was requested.
        index: usize,
        /// The number of pages actually present.
        count: usize,
    },
    /// Overlay canvas serialization or overlay re-parse failed.
    Serialize(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Parse(msg) => write!(f, "parse error: {msg}"),
            FormError::Io(msg) => write!(f, "I/O error: {msg}"),
            FormError::PasswordRequired => {
                write!(f, "PDF is encrypted and cannot be processed")
            }
            FormError::PageOutOfRange { index, count } => {
                write!(f, "page index {index} out of range (0..{count})")
            }
            FormError::Serialize(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormError {}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::Io(err.to_string())
    }
}
