//! Error types for finflow-parser

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    /// Raised by extraction backends that can fail (remote NLP services and the like).
    /// The rule-table extractor never produces it.
    #[error("Extraction backend error: {message}")]
    BackendError { message: String },
}
