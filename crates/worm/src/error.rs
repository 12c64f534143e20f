//! WORM ledger errors

use thiserror::Error;

use crate::hash::ChainError;

/// Errors from the WORM ledger
#[derive(Debug, Error)]
pub enum WormError {
    #[error("Ledger storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Ledger integrity failure: {0}")]
    Integrity(#[from] ChainError),

    #[error("Ledger chain is compromised; appends are halted")]
    ChainCompromised,
}

/// Result type for ledger operations
pub type WormResult<T> = Result<T, WormError>;
