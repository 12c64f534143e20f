//! Vigil Scenarios - Trading and crypto surveillance detectors
//!
//! Detectors are pluggable: the engine runs every registered
//! [`ScenarioDetector`] over an immutable [`DetectionContext`] snapshot and
//! collects alerts, continuing past individual detector failures.
//!
//! ## Built-ins
//!
//! - `WASH_TRADE` - opposing trades in one account within 5 minutes
//! - `FRONT_RUN` - rep's own account trades ahead of a client fill
//! - `MIXER_PROXIMITY` - wallet within 2 hops of a severe-risk node

pub mod config;
pub mod context;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod traits;

pub use config::DetectorConfig;
pub use context::DetectionContext;
pub use detectors::{
    FrontRunningDetector, MixerProximityDetector, WashTradeDetector, FRONT_RUN,
    FRONT_RUN_SEVERITY, MIXER_PROXIMITY, MIXER_PROXIMITY_SEVERITY, WASH_TRADE,
    WASH_TRADE_SEVERITY,
};
pub use engine::{DetectorFailure, ScenarioEngine, ScenarioRun};
pub use error::{DetectorError, DetectorResult};
pub use traits::{NoOpDetector, ScenarioDetector};
