//! Insider list errors

use thiserror::Error;

use vigil_worm::WormError;

/// Errors from the insider list service
#[derive(Debug, Error)]
pub enum InsiderError {
    #[error("Unknown issuer: {0}")]
    UnknownIssuer(String),

    #[error("No active wall crossing for person {person_id} on issuer {issuer_id}")]
    UnknownCrossing {
        person_id: String,
        issuer_id: String,
    },

    #[error("Ledger error: {0}")]
    Ledger(#[from] WormError),
}

/// Result type for insider list operations
pub type InsiderResult<T> = Result<T, InsiderError>;
