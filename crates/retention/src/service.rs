//! Retention service
//!
//! Archives communications under named retention policies and walks each
//! record through its lifecycle: archived until its policy window ends,
//! expired once a sweep observes the window has passed, purged when the
//! retained content is destroyed. Every transition is a WORM ledger event
//! written before the record moves, and sweeps are idempotent: re-running
//! one converges on the same end state because each transition keys off
//! the record's current status.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use vigil_core::Communication;
use vigil_worm::WormLedger;

use crate::error::{RetentionError, RetentionResult};
use crate::events::RetentionEvent;
use crate::types::{RetentionPolicy, RetentionRecord, RetentionStatus};

#[derive(Default)]
struct RetentionState {
    /// Retention key -> policy
    policies: HashMap<String, RetentionPolicy>,
    /// Comm id -> record
    records: HashMap<String, RetentionRecord>,
}

/// Communications archival under retention policies
pub struct RetentionService {
    ledger: Arc<WormLedger>,
    state: Mutex<RetentionState>,
}

impl RetentionService {
    pub fn new(ledger: Arc<WormLedger>) -> Self {
        Self {
            ledger,
            state: Mutex::new(RetentionState::default()),
        }
    }

    /// Register or update a retention policy
    pub fn set_policy(&self, policy: RetentionPolicy) -> RetentionResult<()> {
        if policy.days < 1 {
            return Err(RetentionError::InvalidPolicy(format!(
                "retention window must be at least one day, got {}",
                policy.days
            )));
        }

        let mut state = self.state.lock().unwrap();
        self.ledger.append_event(&RetentionEvent::RetentionPolicySet {
            policy: policy.clone(),
        })?;
        tracing::info!(
            retention_key = %policy.retention_key,
            days = policy.days,
            "Retention policy set"
        );
        state.policies.insert(policy.retention_key.clone(), policy);
        Ok(())
    }

    /// Archive a communication under a policy, retaining its text
    pub fn archive(
        &self,
        comm: &Communication,
        policy_key: &str,
    ) -> RetentionResult<RetentionRecord> {
        let mut state = self.state.lock().unwrap();
        let days = state
            .policies
            .get(policy_key)
            .map(|p| p.days)
            .ok_or_else(|| RetentionError::UnknownPolicy(policy_key.to_string()))?;
        if state.records.contains_key(&comm.id) {
            return Err(RetentionError::AlreadyArchived(comm.id.clone()));
        }

        let archived_at = Utc::now();
        let record = RetentionRecord {
            comm_id: comm.id.clone(),
            policy_key: policy_key.to_string(),
            status: RetentionStatus::Archived,
            archived_at,
            expires_at: archived_at + Duration::days(days),
            purged_at: None,
            content: Some(comm.text.clone()),
        };

        self.ledger.append_event(&RetentionEvent::CommArchived {
            record: record.clone(),
        })?;
        state.records.insert(record.comm_id.clone(), record.clone());

        tracing::debug!(
            comm_id = %record.comm_id,
            policy_key = %record.policy_key,
            expires_at = %record.expires_at,
            "Communication archived"
        );
        Ok(record)
    }

    /// Sweep archived records whose retention window has passed.
    ///
    /// Only `Archived` records move; expired and purged records are never
    /// revisited, so re-running a sweep with the same `as_of` is a no-op.
    pub fn mark_expired(&self, as_of: DateTime<Utc>) -> RetentionResult<Vec<RetentionRecord>> {
        let mut state = self.state.lock().unwrap();
        let due: Vec<String> = state
            .records
            .values()
            .filter(|r| r.is_archived() && r.expires_at < as_of)
            .map(|r| r.comm_id.clone())
            .collect();

        let mut expired = Vec::with_capacity(due.len());
        for comm_id in due {
            self.ledger.append_event(&RetentionEvent::CommExpired {
                comm_id: comm_id.clone(),
            })?;
            // ids came from the map above, under the same lock
            let record = state.records.get_mut(&comm_id).unwrap();
            record.status = RetentionStatus::Expired;
            expired.push(record.clone());
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), as_of = %as_of, "Retention sweep expired records");
        }
        Ok(expired)
    }

    /// Destroy the retained content of every expired record.
    ///
    /// Records still inside their retention window are never touched,
    /// regardless of any caller-supplied timestamps elsewhere.
    pub fn purge_expired(&self) -> RetentionResult<Vec<RetentionRecord>> {
        let mut state = self.state.lock().unwrap();
        let due: Vec<String> = state
            .records
            .values()
            .filter(|r| r.is_expired())
            .map(|r| r.comm_id.clone())
            .collect();

        let mut purged = Vec::with_capacity(due.len());
        for comm_id in due {
            let purged_at = Utc::now();
            self.ledger.append_event(&RetentionEvent::CommPurged {
                comm_id: comm_id.clone(),
                purged_at,
            })?;
            let record = state.records.get_mut(&comm_id).unwrap();
            record.status = RetentionStatus::Purged;
            record.purged_at = Some(purged_at);
            record.content = None;
            purged.push(record.clone());
        }

        if !purged.is_empty() {
            tracing::info!(count = purged.len(), "Retention purge destroyed expired content");
        }
        Ok(purged)
    }

    pub fn get_record(&self, comm_id: &str) -> Option<RetentionRecord> {
        self.state.lock().unwrap().records.get(comm_id).cloned()
    }

    pub fn list_records(&self) -> Vec<RetentionRecord> {
        self.state.lock().unwrap().records.values().cloned().collect()
    }

    pub fn get_policy(&self, retention_key: &str) -> Option<RetentionPolicy> {
        self.state
            .lock()
            .unwrap()
            .policies
            .get(retention_key)
            .cloned()
    }

    /// Rebuild policies and records by folding retention events out of the
    /// ledger. Purged records come back purged, without content.
    pub fn replay(ledger: Arc<WormLedger>) -> Self {
        let mut state = RetentionState::default();

        for block in ledger.all() {
            let event: RetentionEvent = match serde_json::from_value(block.payload) {
                Ok(event) => event,
                Err(_) => continue,
            };
            match event {
                RetentionEvent::RetentionPolicySet { policy } => {
                    state.policies.insert(policy.retention_key.clone(), policy);
                }
                RetentionEvent::CommArchived { record } => {
                    state.records.insert(record.comm_id.clone(), record);
                }
                RetentionEvent::CommExpired { comm_id } => {
                    if let Some(record) = state.records.get_mut(&comm_id) {
                        record.status = RetentionStatus::Expired;
                    }
                }
                RetentionEvent::CommPurged { comm_id, purged_at } => {
                    if let Some(record) = state.records.get_mut(&comm_id) {
                        record.status = RetentionStatus::Purged;
                        record.purged_at = Some(purged_at);
                        record.content = None;
                    }
                }
            }
        }

        Self {
            ledger,
            state: Mutex::new(state),
        }
    }
}
