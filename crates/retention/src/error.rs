//! Retention errors

use thiserror::Error;

use vigil_worm::WormError;

/// Errors from the retention lifecycle
#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("Unknown retention policy: {0}")]
    UnknownPolicy(String),

    #[error("Invalid retention policy: {0}")]
    InvalidPolicy(String),

    #[error("Communication {0} is already archived")]
    AlreadyArchived(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] WormError),
}

/// Result type for retention operations
pub type RetentionResult<T> = Result<T, RetentionError>;
