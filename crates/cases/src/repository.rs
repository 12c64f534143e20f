//! Case repository - exclusive owner of cases, items, and indices
//!
//! The repository is a plain in-memory projection. It is constructed by
//! the caller and handed to [`crate::service::CaseService`], which wraps
//! it in a mutex; nothing here locks, logs, or writes to the ledger. All
//! of its contents can be rebuilt by replaying the ledger.

use std::collections::HashMap;

use vigil_core::SurveillanceAlert;

use crate::error::{CaseError, CaseResult};
use crate::records::{CaseItemRecord, CaseRecord};

/// Severity at or above which a linked alert anchors its scenario
pub const AUTO_CASE_SEVERITY: u8 = 80;

/// In-memory projection of the case workflow
#[derive(Default)]
pub struct CaseRepository {
    /// Case id -> case
    cases: HashMap<String, CaseRecord>,
    /// Case id -> activity log, in append order
    items: HashMap<String, Vec<CaseItemRecord>>,
    /// `"<scenario>|<key>"` -> case id
    alert_key_index: HashMap<String, String>,
    /// Scenario -> anchor case id (set by the first high-severity alert)
    scenario_index: HashMap<String, String>,
}

/// The correlation slot for an alert
pub fn alert_index_key(alert: &SurveillanceAlert) -> String {
    format!("{}|{}", alert.scenario, alert.key)
}

impl CaseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_case(&mut self, case: CaseRecord) {
        self.items.entry(case.id.clone()).or_default();
        self.cases.insert(case.id.clone(), case);
    }

    pub fn get(&self, case_id: &str) -> CaseResult<&CaseRecord> {
        self.cases
            .get(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.to_string()))
    }

    pub fn get_mut(&mut self, case_id: &str) -> CaseResult<&mut CaseRecord> {
        self.cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.to_string()))
    }

    pub fn contains(&self, case_id: &str) -> bool {
        self.cases.contains_key(case_id)
    }

    pub fn list(&self) -> Vec<CaseRecord> {
        self.cases.values().cloned().collect()
    }

    pub fn items(&self, case_id: &str) -> Vec<CaseItemRecord> {
        self.items.get(case_id).cloned().unwrap_or_default()
    }

    pub fn push_item(&mut self, item: CaseItemRecord) {
        self.items.entry(item.case_id.clone()).or_default().push(item);
    }

    /// The open case with this exact title, if any
    pub fn find_open_by_title(&self, title: &str) -> Option<&CaseRecord> {
        self.cases
            .values()
            .find(|c| c.title == title && c.status.is_open())
    }

    /// The case already holding this alert id, if any
    pub fn find_case_with_alert(&self, alert_id: &str) -> Option<&CaseRecord> {
        self.cases.values().find(|c| c.has_alert(alert_id))
    }

    pub fn case_for_alert_key(&self, index_key: &str) -> Option<&String> {
        self.alert_key_index.get(index_key)
    }

    pub fn case_for_scenario(&self, scenario: &str) -> Option<&String> {
        self.scenario_index.get(scenario)
    }

    /// Claim the correlation slot for an alert.
    ///
    /// Compare-and-swap discipline: claiming a slot already held by a
    /// different case is a conflict, never an overwrite.
    pub fn claim_alert_key(&mut self, index_key: &str, case_id: &str) -> CaseResult<()> {
        match self.alert_key_index.get(index_key) {
            Some(existing) if existing != case_id => Err(CaseError::ConcurrencyConflict {
                key: index_key.to_string(),
                existing: existing.clone(),
                attempted: case_id.to_string(),
            }),
            _ => {
                self.alert_key_index
                    .insert(index_key.to_string(), case_id.to_string());
                Ok(())
            }
        }
    }

    /// Anchor a scenario to a case if no case holds it yet
    pub fn anchor_scenario(&mut self, scenario: &str, case_id: &str) {
        self.scenario_index
            .entry(scenario.to_string())
            .or_insert_with(|| case_id.to_string());
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Index snapshots, for equivalence checks after replay
    pub fn index_snapshot(&self) -> (HashMap<String, String>, HashMap<String, String>) {
        (self.alert_key_index.clone(), self.scenario_index.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CaseStatus;
    use chrono::Utc;

    fn create_case(id: &str, title: &str) -> CaseRecord {
        CaseRecord {
            id: id.to_string(),
            title: title.to_string(),
            status: CaseStatus::Open,
            owner_id: None,
            summary: None,
            alerts: vec![],
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn test_get_unknown_case() {
        let repo = CaseRepository::new();
        assert!(matches!(repo.get("missing"), Err(CaseError::NotFound(_))));
    }

    #[test]
    fn test_claim_is_idempotent_per_case() {
        let mut repo = CaseRepository::new();
        repo.insert_case(create_case("c1", "X investigation"));

        repo.claim_alert_key("X|k", "c1").unwrap();
        repo.claim_alert_key("X|k", "c1").unwrap();
        assert_eq!(repo.case_for_alert_key("X|k"), Some(&"c1".to_string()));
    }

    #[test]
    fn test_claim_conflict_detected() {
        let mut repo = CaseRepository::new();
        repo.claim_alert_key("X|k", "c1").unwrap();

        let result = repo.claim_alert_key("X|k", "c2");
        assert!(matches!(
            result,
            Err(CaseError::ConcurrencyConflict { existing, .. }) if existing == "c1"
        ));
    }

    #[test]
    fn test_anchor_scenario_keeps_first() {
        let mut repo = CaseRepository::new();
        repo.anchor_scenario("WASH_TRADE", "c1");
        repo.anchor_scenario("WASH_TRADE", "c2");

        assert_eq!(repo.case_for_scenario("WASH_TRADE"), Some(&"c1".to_string()));
    }

    #[test]
    fn test_find_open_by_title_skips_closed() {
        let mut repo = CaseRepository::new();
        let mut closed = create_case("c1", "Triage Queue");
        closed.status = CaseStatus::Closed(crate::records::Disposition::NoIssue);
        repo.insert_case(closed);

        assert!(repo.find_open_by_title("Triage Queue").is_none());
    }
}
