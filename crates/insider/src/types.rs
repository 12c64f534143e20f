//! Insider list domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vigil_core::SurveillanceAlert;

/// A restricted issuer with its sensitivity window.
///
/// While `restricted_list` is set and a trade's execution time falls inside
/// `[window_start, window_end]`, wall-crossed people must not trade the
/// issuer's symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issuer {
    pub id: String,
    pub symbol: String,
    pub name: String,
    /// The corporate event driving the window (e.g. `"EARNINGS"`, `"M_AND_A"`)
    pub event: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub restricted_list: bool,
}

/// Input for registering an issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerSpec {
    pub symbol: String,
    pub name: String,
    pub event: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub restricted_list: bool,
}

/// A person brought over the wall for an issuer.
///
/// The person is "inside" from `wall_crossed_at` until `wall_crossed_off`
/// (open-ended while `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallCrossing {
    pub person_id: String,
    pub issuer_id: String,
    pub wall_crossed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_crossed_off: Option<DateTime<Utc>>,
}

impl WallCrossing {
    /// Whether the person is inside the wall at the given instant
    pub fn is_inside_at(&self, t: DateTime<Utc>) -> bool {
        self.wall_crossed_at <= t && self.wall_crossed_off.map_or(true, |off| off > t)
    }
}

/// Input for crossing a person over the wall
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPersonInput {
    pub person_id: String,
    pub issuer_id: String,
    pub wall_crossed_at: DateTime<Utc>,
}

/// Outcome of assessing one trade against the insider list
#[derive(Debug, Clone)]
pub struct TradeAssessment {
    pub allowed: bool,
    pub alerts: Vec<SurveillanceAlert>,
}

impl TradeAssessment {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            alerts: Vec::new(),
        }
    }

    pub fn blocked(alert: SurveillanceAlert) -> Self {
        Self {
            allowed: false,
            alerts: vec![alert],
        }
    }
}
