//! Retention policies and per-communication records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How long communications under a given key must be retained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    /// Policy identifier, e.g. `email_standard`
    pub retention_key: String,
    pub days: i64,
}

/// Where a record sits in the retention lifecycle.
///
/// Strictly monotonic: `Archived -> Expired -> Purged`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetentionStatus {
    Archived,
    Expired,
    Purged,
}

/// One archived communication under a retention policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionRecord {
    pub comm_id: String,
    pub policy_key: String,
    pub status: RetentionStatus,
    pub archived_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purged_at: Option<DateTime<Utc>>,
    /// Retained communication text; cleared on purge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RetentionRecord {
    pub fn is_archived(&self) -> bool {
        self.status == RetentionStatus::Archived
    }

    pub fn is_expired(&self) -> bool {
        self.status == RetentionStatus::Expired
    }

    pub fn is_purged(&self) -> bool {
        self.status == RetentionStatus::Purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_shape() {
        let now = Utc::now();
        let record = RetentionRecord {
            comm_id: "comm-1".to_string(),
            policy_key: "email_standard".to_string(),
            status: RetentionStatus::Archived,
            archived_at: now,
            expires_at: now + chrono::Duration::days(1),
            purged_at: None,
            content: Some("Proposal".to_string()),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["commId"], "comm-1");
        assert_eq!(value["status"], "Archived");
        assert_eq!(value["content"], "Proposal");
        // absent until purge
        assert!(value.get("purgedAt").is_none());
    }

    #[test]
    fn test_purged_record_omits_content() {
        let now = Utc::now();
        let record = RetentionRecord {
            comm_id: "comm-1".to_string(),
            policy_key: "email_standard".to_string(),
            status: RetentionStatus::Purged,
            archived_at: now,
            expires_at: now,
            purged_at: Some(now),
            content: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("content").is_none());
        assert_eq!(value["status"], "Purged");
    }
}
