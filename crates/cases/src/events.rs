//! Case and suppression ledger events
//!
//! Everything the case workflow decides is written to the WORM ledger as
//! one of these events, before the in-memory projection is touched. Replay
//! of these events reproduces the projection exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vigil_core::SurveillanceAlert;

use crate::records::{CaseItemRecord, CaseRecord, Disposition};
use crate::suppression::SuppressionRule;

/// Events the case workflow writes to the WORM ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CaseEvent {
    /// A case was opened (alerts arrive as separate link events)
    CaseCreated { case: CaseRecord },

    /// An alert was linked into a case. Carries the full alert and the
    /// minted activity item so replay can rebuild both.
    CaseAlertLinked {
        case_id: String,
        alert: SurveillanceAlert,
        item: CaseItemRecord,
    },

    CaseNoteAdded {
        case_id: String,
        item: CaseItemRecord,
    },

    CaseDocumentAttached {
        case_id: String,
        item: CaseItemRecord,
    },

    CaseTaskCreated {
        case_id: String,
        item: CaseItemRecord,
    },

    CaseClosed {
        case_id: String,
        disposition: Disposition,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
        closed_by: String,
        closed_at: DateTime<Utc>,
    },

    /// A closed case was reopened as a fresh case
    CaseReopened {
        case_id: String,
        source_case_id: String,
        opened_by: String,
    },

    SuppressionRuleAdded { rule: SuppressionRule },

    /// An alert was filtered out by an active suppression rule
    AlertSuppressed {
        alert_id: String,
        scenario: String,
        key: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CaseItemType, CaseStatus};
    use serde_json::json;

    #[test]
    fn test_case_created_wire_shape() {
        let event = CaseEvent::CaseCreated {
            case: CaseRecord {
                id: "c1".to_string(),
                title: "Triage Queue".to_string(),
                status: CaseStatus::Open,
                owner_id: None,
                summary: Some("Pending alerts".to_string()),
                alerts: vec![],
                created_at: Utc::now(),
                closed_at: None,
            },
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "CASE_CREATED");
        assert_eq!(value["case"]["title"], "Triage Queue");
    }

    #[test]
    fn test_case_closed_wire_shape() {
        let event = CaseEvent::CaseClosed {
            case_id: "c1".to_string(),
            disposition: Disposition::SarFiled,
            summary: Some("Escalated".to_string()),
            closed_by: "alexa".to_string(),
            closed_at: Utc::now(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "CASE_CLOSED");
        assert_eq!(value["disposition"], "SAR Filed");
        assert_eq!(value["closedBy"], "alexa");
    }

    #[test]
    fn test_alert_linked_round_trip() {
        let alert = SurveillanceAlert::new(
            vigil_core::AlertKind::Crypto,
            "MIXER_PROXIMITY",
            85,
            "wallet|0xabc",
            json!({"wallet": "0xabc"}),
        );
        let event = CaseEvent::CaseAlertLinked {
            case_id: "c1".to_string(),
            alert: alert.clone(),
            item: CaseItemRecord {
                id: "i1".to_string(),
                case_id: "c1".to_string(),
                item_type: CaseItemType::Alert,
                ref_id: alert.id.clone(),
                meta: alert.signal.clone(),
            },
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "CASE_ALERT_LINKED");

        let parsed: CaseEvent = serde_json::from_value(value).unwrap();
        match parsed {
            CaseEvent::CaseAlertLinked { alert: parsed_alert, .. } => {
                assert_eq!(parsed_alert, alert);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
