//! Lexicon errors

use thiserror::Error;

/// Errors from the lexicon engine
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Invalid lexicon pattern in {category}: {message}")]
    InvalidPattern { category: String, message: String },
}

/// Result type for lexicon operations
pub type LexiconResult<T> = Result<T, LexiconError>;
