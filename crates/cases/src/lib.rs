//! Vigil Cases - alert intake and investigation workflow
//!
//! Everything that happens to an alert after detection lives here: batch
//! deduplication, suppression rules, correlation into investigation cases,
//! and the case lifecycle itself (notes, documents, tasks, close with a
//! disposition, reopen as a fresh linked case). Every state change is
//! appended to the WORM ledger before the in-memory projection moves, so
//! the whole workflow can be rebuilt from the chain.

pub mod error;
pub mod events;
pub mod pipeline;
pub mod records;
pub mod repository;
pub mod service;
pub mod suppression;

pub use error::{CaseError, CaseResult};
pub use events::CaseEvent;
pub use pipeline::{AlertOutcome, AlertPipeline};
pub use records::{
    CaseItemRecord, CaseItemType, CaseNoteInput, CaseRecord, CaseStatus, CaseTaskInput,
    CloseCaseInput, CreateCaseInput, Disposition,
};
pub use repository::{alert_index_key, CaseRepository, AUTO_CASE_SEVERITY};
pub use service::{CaseService, TRIAGE_CASE_TITLE};
pub use suppression::{AlertDeduper, SuppressionRule, SuppressionService};
