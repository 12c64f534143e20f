//! Surveillance alerts - the unit of work every detector produces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum alert severity
pub const MAX_SEVERITY: u8 = 100;

/// Which surveillance surface produced the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    Trading,
    Crypto,
    Comms,
}

/// Lifecycle status of an alert.
///
/// An alert starts `Open` and moves to exactly one of `Suppressed` (a rule
/// filtered it out) or `Linked` (it was correlated into a case). `Closed`
/// follows `Linked` when the owning case is dispositioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertStatus {
    Open,
    Suppressed,
    Linked,
    Closed,
}

/// A surveillance alert.
///
/// `key` is the scenario-specific correlation string (e.g. `"wallet|0xabc"`):
/// two alerts with the same `(scenario, key)` describe the same underlying
/// situation and must land on the same case. `signal` carries the
/// scenario-specific evidence payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveillanceAlert {
    pub id: String,
    pub kind: AlertKind,
    pub scenario: String,
    /// 0..=100, scenario-dependent
    pub severity: u8,
    pub status: AlertStatus,
    pub key: String,
    pub signal: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SurveillanceAlert {
    /// Create a new open alert with a fresh id. Severity is clamped to 100.
    pub fn new(
        kind: AlertKind,
        scenario: impl Into<String>,
        severity: u8,
        key: impl Into<String>,
        signal: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            scenario: scenario.into(),
            severity: severity.min(MAX_SEVERITY),
            status: AlertStatus::Open,
            key: key.into(),
            signal,
            created_at: Utc::now(),
        }
    }

    /// True while the alert has not yet been suppressed, linked, or closed
    pub fn is_open(&self) -> bool {
        matches!(self.status, AlertStatus::Open)
    }
}
