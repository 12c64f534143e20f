//! Vigil Retention - communications archival and retention lifecycle
//!
//! Books captured communications into named retention policies and walks
//! each record through `Archived -> Expired -> Purged`, logging every
//! transition to the WORM ledger before it takes effect. Sweeps are
//! idempotent, so a schedule can re-run them freely.

pub mod error;
pub mod events;
pub mod service;
pub mod types;

pub use error::{RetentionError, RetentionResult};
pub use events::RetentionEvent;
pub use service::RetentionService;
pub use types::{RetentionPolicy, RetentionRecord, RetentionStatus};
