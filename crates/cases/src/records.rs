//! Case records and workflow inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vigil_core::SurveillanceAlert;

/// How a closed case was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    #[serde(rename = "No Issue")]
    NoIssue,
    Training,
    Discipline,
    #[serde(rename = "SAR Filed")]
    SarFiled,
    Remediation,
}

/// Case lifecycle status.
///
/// Strictly monotonic: `Open -> Closed(..)`, never back. Reopening an
/// investigation is modeled as a fresh case linked to the closed one, so a
/// closed record stays immutable evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Open,
    Closed(Disposition),
}

impl CaseStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, CaseStatus::Open)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, CaseStatus::Closed(_))
    }
}

/// An investigation case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub alerts: Vec<SurveillanceAlert>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl CaseRecord {
    /// Whether an alert with this id is already linked
    pub fn has_alert(&self, alert_id: &str) -> bool {
        self.alerts.iter().any(|a| a.id == alert_id)
    }
}

/// Kind of per-case activity entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseItemType {
    Note,
    Document,
    Task,
    Alert,
}

/// One entry in a case's append-only activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseItemRecord {
    pub id: String,
    pub case_id: String,
    #[serde(rename = "type")]
    pub item_type: CaseItemType,
    /// What the item points at: alert id, document id, task id, or author
    pub ref_id: String,
    pub meta: serde_json::Value,
}

/// Input for creating a case directly
#[derive(Debug, Clone, Default)]
pub struct CreateCaseInput {
    pub title: String,
    pub summary: Option<String>,
    pub owner_id: Option<String>,
    pub alerts: Vec<SurveillanceAlert>,
}

/// Input for closing a case
#[derive(Debug, Clone)]
pub struct CloseCaseInput {
    pub case_id: String,
    pub disposition: Disposition,
    pub summary: Option<String>,
    pub closed_by: String,
}

/// Input for adding a note
#[derive(Debug, Clone)]
pub struct CaseNoteInput {
    pub author_id: String,
    pub body: String,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseTaskInput {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}
