//! Retention ledger events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RetentionPolicy, RetentionRecord};

/// Events the retention service writes to the WORM ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum RetentionEvent {
    RetentionPolicySet { policy: RetentionPolicy },

    /// Carries the full record, retained content included, so replay can
    /// restore everything up to the purge
    CommArchived { record: RetentionRecord },

    CommExpired { comm_id: String },

    CommPurged {
        comm_id: String,
        purged_at: DateTime<Utc>,
    },
}
