//! Vigil Insider - Restricted list and wall-crossing enforcement
//!
//! Maintains the universe of restricted issuers (each with a sensitivity
//! window) and the people currently over the wall for them. Trades are
//! assessed at their execution time; a wall-crossed person trading a
//! restricted symbol inside its window is blocked with a high-severity
//! alert, and the block itself is evidence in the WORM ledger.

pub mod error;
pub mod events;
pub mod service;
pub mod types;

pub use error::{InsiderError, InsiderResult};
pub use events::InsiderEvent;
pub use service::{InsiderListService, INSIDER_WINDOW_BREACH, INSIDER_WINDOW_BREACH_SEVERITY};
pub use types::{AddPersonInput, Issuer, IssuerSpec, TradeAssessment, WallCrossing};
