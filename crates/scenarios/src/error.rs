//! Detector errors

use thiserror::Error;

/// Errors from an individual scenario detector
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Detector input error: {0}")]
    BadInput(String),

    #[error("Detector internal error: {0}")]
    Internal(String),
}

/// Result type for detector runs
pub type DetectorResult<T> = Result<T, DetectorError>;
