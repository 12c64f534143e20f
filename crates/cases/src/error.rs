//! Case workflow errors

use thiserror::Error;

use vigil_worm::WormError;

/// Errors from the case workflow, suppression, and pipeline
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Unknown case: {0}")]
    NotFound(String),

    #[error("Case {0} is already closed")]
    AlreadyClosed(String),

    #[error("Case {0} is not closed")]
    NotClosed(String),

    #[error("Correlation conflict on '{key}': case {existing} holds the slot, attempted {attempted}")]
    ConcurrencyConflict {
        key: String,
        existing: String,
        attempted: String,
    },

    #[error("Invalid suppression rule: {0}")]
    InvalidSuppressionRule(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] WormError),
}

/// Result type for case operations
pub type CaseResult<T> = Result<T, CaseError>;
