//! Vigil Core - Domain types
//!
//! This crate contains the types shared across the surveillance core:
//! - `Trade`, `WalletTransfer`, `Communication`: the three upstream feeds
//! - `SurveillanceAlert`: the unit of work every detector produces
//! - input validation applied before anything enters the pipeline
//!
//! Feed types serialize with camelCase field names to match the upstream
//! wire shape; enum values keep the upstream UPPER_SNAKE spelling.

pub mod alert;
pub mod comms;
pub mod trade;
pub mod validation;
pub mod wallet;

pub use alert::{AlertKind, AlertStatus, SurveillanceAlert};
pub use comms::{Channel, Communication};
pub use trade::{AssetType, Trade, TradeSide};
pub use validation::{
    validate_alert, validate_communication, validate_trade, validate_transfer, ValidationError,
};
pub use wallet::{RiskLevel, ScreeningNode, TransferDirection, WalletTransfer};
