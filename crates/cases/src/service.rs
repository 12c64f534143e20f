//! Case workflow service
//!
//! Correlates incoming alerts into investigation cases and drives the case
//! lifecycle (notes, documents, tasks, close, reopen-as-new-case). Every
//! decision is appended to the WORM ledger before the in-memory projection
//! changes, so the projection is always reconstructible via [`CaseService::replay`].
//!
//! Correlation order for an ingested alert:
//! 1. exact `scenario|key` slot in the alert-key index
//! 2. the scenario's anchor case, if one exists
//! 3. severity at or above [`AUTO_CASE_SEVERITY`] opens a dedicated
//!    `<scenario> investigation` case
//! 4. everything else lands on the shared open Triage Queue
//!
//! The alert-key index doubles as the correlation guard: linking claims the
//! slot compare-and-swap style, and a claim held by a different case is a
//! conflict. Ingest re-resolves once through the index before surfacing
//! [`CaseError::ConcurrencyConflict`].

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use vigil_core::{AlertStatus, SurveillanceAlert};
use vigil_worm::WormLedger;

use crate::error::{CaseError, CaseResult};
use crate::events::CaseEvent;
use crate::records::{
    CaseItemRecord, CaseItemType, CaseNoteInput, CaseRecord, CaseStatus, CaseTaskInput,
    CloseCaseInput, CreateCaseInput,
};
use crate::repository::{alert_index_key, CaseRepository, AUTO_CASE_SEVERITY};

/// Title of the shared catch-all case for low-severity alerts
pub const TRIAGE_CASE_TITLE: &str = "Triage Queue";

/// Alert correlation and case lifecycle, backed by the WORM ledger
pub struct CaseService {
    repo: Mutex<CaseRepository>,
    ledger: Arc<WormLedger>,
}

impl CaseService {
    /// The repository is injected so callers control its lifetime and
    /// can seed it (e.g. from a replayed projection).
    pub fn new(repo: CaseRepository, ledger: Arc<WormLedger>) -> Self {
        Self {
            repo: Mutex::new(repo),
            ledger,
        }
    }

    // ========================================================================
    // Alert correlation
    // ========================================================================

    /// Route an alert to a case, creating one if correlation requires it.
    ///
    /// Idempotent per alert id: an alert already held by some case returns
    /// that case without writing anything.
    pub fn ingest_alert(&self, alert: SurveillanceAlert) -> CaseResult<CaseRecord> {
        let mut repo = self.repo.lock().unwrap();

        if let Some(existing) = repo.find_case_with_alert(&alert.id) {
            return Ok(existing.clone());
        }

        let index_key = alert_index_key(&alert);
        let mut retried = false;
        loop {
            let target = match repo.case_for_alert_key(&index_key) {
                Some(case_id) => case_id.clone(),
                None => match repo.case_for_scenario(&alert.scenario) {
                    Some(case_id) => case_id.clone(),
                    None if alert.severity >= AUTO_CASE_SEVERITY => {
                        return self.create_case_locked(
                            &mut repo,
                            CreateCaseInput {
                                title: format!("{} investigation", alert.scenario),
                                summary: Some(format!("Auto-created for alert {}", alert.id)),
                                owner_id: None,
                                alerts: vec![alert],
                            },
                        );
                    }
                    None => self.triage_case_locked(&mut repo)?,
                },
            };

            match self.link_alert_locked(&mut repo, &target, alert.clone()) {
                Ok(()) => return Ok(repo.get(&target)?.clone()),
                // another case took the slot; follow the index once
                Err(CaseError::ConcurrencyConflict { .. }) if !retried => retried = true,
                Err(e) => return Err(e),
            }
        }
    }

    /// Link an alert into a specific case. No-op if the case already holds
    /// the alert id; claims the alert-key slot before writing the event.
    fn link_alert_locked(
        &self,
        repo: &mut CaseRepository,
        case_id: &str,
        mut alert: SurveillanceAlert,
    ) -> CaseResult<()> {
        if repo.get(case_id)?.has_alert(&alert.id) {
            return Ok(());
        }

        let index_key = alert_index_key(&alert);
        repo.claim_alert_key(&index_key, case_id)?;

        alert.status = AlertStatus::Linked;
        let item = CaseItemRecord {
            id: Uuid::new_v4().to_string(),
            case_id: case_id.to_string(),
            item_type: CaseItemType::Alert,
            ref_id: alert.id.clone(),
            meta: alert.signal.clone(),
        };
        self.ledger.append_event(&CaseEvent::CaseAlertLinked {
            case_id: case_id.to_string(),
            alert: alert.clone(),
            item: item.clone(),
        })?;

        let anchors_scenario = alert.severity >= AUTO_CASE_SEVERITY;
        let scenario = alert.scenario.clone();
        tracing::debug!(
            case_id = %case_id,
            alert_id = %alert.id,
            scenario = %scenario,
            severity = alert.severity,
            "Alert linked"
        );

        repo.get_mut(case_id)?.alerts.push(alert);
        repo.push_item(item);
        if anchors_scenario {
            repo.anchor_scenario(&scenario, case_id);
        }
        Ok(())
    }

    fn triage_case_locked(&self, repo: &mut CaseRepository) -> CaseResult<String> {
        if let Some(existing) = repo.find_open_by_title(TRIAGE_CASE_TITLE) {
            return Ok(existing.id.clone());
        }
        let triage = self.create_case_locked(
            repo,
            CreateCaseInput {
                title: TRIAGE_CASE_TITLE.to_string(),
                summary: Some("Pending alerts".to_string()),
                ..Default::default()
            },
        )?;
        Ok(triage.id)
    }

    // ========================================================================
    // Case lifecycle
    // ========================================================================

    pub fn create_case(&self, input: CreateCaseInput) -> CaseResult<CaseRecord> {
        let mut repo = self.repo.lock().unwrap();
        self.create_case_locked(&mut repo, input)
    }

    /// The creation event always carries an empty alert list; initial
    /// alerts go through the normal link path so the index and scenario
    /// anchor are registered for them too.
    fn create_case_locked(
        &self,
        repo: &mut CaseRepository,
        input: CreateCaseInput,
    ) -> CaseResult<CaseRecord> {
        let case = CaseRecord {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            status: CaseStatus::Open,
            owner_id: input.owner_id,
            summary: input.summary,
            alerts: Vec::new(),
            created_at: Utc::now(),
            closed_at: None,
        };
        self.ledger
            .append_event(&CaseEvent::CaseCreated { case: case.clone() })?;

        tracing::info!(case_id = %case.id, title = %case.title, "Case created");
        let case_id = case.id.clone();
        repo.insert_case(case);

        for alert in input.alerts {
            self.link_alert_locked(repo, &case_id, alert)?;
        }
        Ok(repo.get(&case_id)?.clone())
    }

    /// Close a case with a disposition. Closing is final; a closed case
    /// can only be continued via [`CaseService::reopen_case`].
    pub fn close_case(&self, input: CloseCaseInput) -> CaseResult<CaseRecord> {
        let mut repo = self.repo.lock().unwrap();
        if repo.get(&input.case_id)?.status.is_closed() {
            return Err(CaseError::AlreadyClosed(input.case_id));
        }

        let closed_at = Utc::now();
        self.ledger.append_event(&CaseEvent::CaseClosed {
            case_id: input.case_id.clone(),
            disposition: input.disposition,
            summary: input.summary.clone(),
            closed_by: input.closed_by.clone(),
            closed_at,
        })?;

        let case = repo.get_mut(&input.case_id)?;
        case.status = CaseStatus::Closed(input.disposition);
        case.closed_at = Some(closed_at);
        if input.summary.is_some() {
            case.summary = input.summary;
        }
        tracing::info!(
            case_id = %case.id,
            disposition = ?input.disposition,
            closed_by = %input.closed_by,
            "Case closed"
        );
        Ok(case.clone())
    }

    /// Continue a closed investigation as a fresh case. The source case
    /// stays closed; the new case carries a document item pointing back.
    pub fn reopen_case(&self, case_id: &str, opened_by: &str) -> CaseResult<CaseRecord> {
        let mut repo = self.repo.lock().unwrap();
        let source = repo.get(case_id)?.clone();
        if !source.status.is_closed() {
            return Err(CaseError::NotClosed(case_id.to_string()));
        }

        let reopened = self.create_case_locked(
            &mut repo,
            CreateCaseInput {
                title: format!("{} (reopened)", source.title),
                summary: source.summary.clone(),
                owner_id: Some(opened_by.to_string()),
                alerts: Vec::new(),
            },
        )?;
        self.ledger.append_event(&CaseEvent::CaseReopened {
            case_id: reopened.id.clone(),
            source_case_id: source.id.clone(),
            opened_by: opened_by.to_string(),
        })?;
        self.attach_document_locked(
            &mut repo,
            &reopened.id,
            &source.id,
            json!({ "reason": "reopened", "sourceCaseId": source.id }),
        )?;

        tracing::info!(
            case_id = %reopened.id,
            source_case_id = %source.id,
            opened_by = %opened_by,
            "Case reopened as new case"
        );
        Ok(repo.get(&reopened.id)?.clone())
    }

    // ========================================================================
    // Case items
    // ========================================================================

    pub fn add_note(&self, case_id: &str, note: CaseNoteInput) -> CaseResult<CaseItemRecord> {
        let mut repo = self.repo.lock().unwrap();
        repo.get(case_id)?;

        let item = CaseItemRecord {
            id: Uuid::new_v4().to_string(),
            case_id: case_id.to_string(),
            item_type: CaseItemType::Note,
            ref_id: note.author_id,
            meta: json!({ "body": note.body, "createdAt": Utc::now() }),
        };
        self.ledger.append_event(&CaseEvent::CaseNoteAdded {
            case_id: case_id.to_string(),
            item: item.clone(),
        })?;
        repo.push_item(item.clone());
        Ok(item)
    }

    pub fn attach_document(
        &self,
        case_id: &str,
        doc_id: &str,
        meta: serde_json::Value,
    ) -> CaseResult<CaseItemRecord> {
        let mut repo = self.repo.lock().unwrap();
        self.attach_document_locked(&mut repo, case_id, doc_id, meta)
    }

    fn attach_document_locked(
        &self,
        repo: &mut CaseRepository,
        case_id: &str,
        doc_id: &str,
        meta: serde_json::Value,
    ) -> CaseResult<CaseItemRecord> {
        repo.get(case_id)?;

        let item = CaseItemRecord {
            id: Uuid::new_v4().to_string(),
            case_id: case_id.to_string(),
            item_type: CaseItemType::Document,
            ref_id: doc_id.to_string(),
            meta,
        };
        self.ledger.append_event(&CaseEvent::CaseDocumentAttached {
            case_id: case_id.to_string(),
            item: item.clone(),
        })?;
        repo.push_item(item.clone());
        Ok(item)
    }

    pub fn create_task(&self, case_id: &str, task: CaseTaskInput) -> CaseResult<CaseItemRecord> {
        let mut repo = self.repo.lock().unwrap();
        repo.get(case_id)?;

        let mut meta = json!({
            "description": task.description,
            "createdAt": Utc::now(),
        });
        if let Some(due_at) = task.due_at {
            meta["dueAt"] = json!(due_at);
        }
        if let Some(assignee_id) = task.assignee_id {
            meta["assigneeId"] = json!(assignee_id);
        }

        let item = CaseItemRecord {
            id: Uuid::new_v4().to_string(),
            case_id: case_id.to_string(),
            item_type: CaseItemType::Task,
            // tasks get their own identity, independent of the item id
            ref_id: Uuid::new_v4().to_string(),
            meta,
        };
        self.ledger.append_event(&CaseEvent::CaseTaskCreated {
            case_id: case_id.to_string(),
            item: item.clone(),
        })?;
        repo.push_item(item.clone());
        Ok(item)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get_case(&self, case_id: &str) -> CaseResult<CaseRecord> {
        self.repo.lock().unwrap().get(case_id).cloned()
    }

    pub fn list_cases(&self) -> Vec<CaseRecord> {
        self.repo.lock().unwrap().list()
    }

    /// Activity log for a case, in append order. Unknown ids yield an
    /// empty log rather than an error.
    pub fn get_items(&self, case_id: &str) -> Vec<CaseItemRecord> {
        self.repo.lock().unwrap().items(case_id)
    }

    // ========================================================================
    // Replay
    // ========================================================================

    /// Rebuild the full projection from the ledger. Events written by other
    /// services sharing the ledger are skipped.
    pub fn replay(ledger: Arc<WormLedger>) -> Self {
        let mut repo = CaseRepository::new();
        for block in ledger.all() {
            let event = match serde_json::from_value::<CaseEvent>(block.payload.clone()) {
                Ok(event) => event,
                Err(_) => continue,
            };
            match event {
                CaseEvent::CaseCreated { case } => repo.insert_case(case),
                CaseEvent::CaseAlertLinked {
                    case_id,
                    alert,
                    item,
                } => {
                    let anchors_scenario = alert.severity >= AUTO_CASE_SEVERITY;
                    let scenario = alert.scenario.clone();
                    let index_key = alert_index_key(&alert);
                    if let Ok(case) = repo.get_mut(&case_id) {
                        if !case.has_alert(&alert.id) {
                            case.alerts.push(alert);
                        }
                    }
                    if let Err(e) = repo.claim_alert_key(&index_key, &case_id) {
                        tracing::warn!(index = block.index, error = %e, "Conflicting link in replay");
                    }
                    repo.push_item(item);
                    if anchors_scenario {
                        repo.anchor_scenario(&scenario, &case_id);
                    }
                }
                CaseEvent::CaseNoteAdded { item, .. }
                | CaseEvent::CaseDocumentAttached { item, .. }
                | CaseEvent::CaseTaskCreated { item, .. } => repo.push_item(item),
                CaseEvent::CaseClosed {
                    case_id,
                    disposition,
                    summary,
                    closed_at,
                    ..
                } => {
                    if let Ok(case) = repo.get_mut(&case_id) {
                        case.status = CaseStatus::Closed(disposition);
                        case.closed_at = Some(closed_at);
                        if summary.is_some() {
                            case.summary = summary;
                        }
                    }
                }
                // the reopened case arrives via its own creation event
                CaseEvent::CaseReopened { .. } => {}
                // suppression state is replayed by its own service
                CaseEvent::SuppressionRuleAdded { .. } | CaseEvent::AlertSuppressed { .. } => {}
            }
        }
        tracing::debug!(cases = repo.case_count(), "Case projection replayed");
        Self {
            repo: Mutex::new(repo),
            ledger,
        }
    }
}
