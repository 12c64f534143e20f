//! Alert suppression rules and batch deduplication
//!
//! Suppression rules silence alerts for known benign patterns (an exchange
//! hot wallet near a mixer, a compensation scheme that trips the promissory
//! lexicon). Rules are scoped to one scenario, match alert keys exactly or
//! by trailing-`*` prefix, and always expire. Rule creation and every
//! suppressed alert are recorded on the ledger before local state changes.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::{AlertStatus, SurveillanceAlert};
use vigil_worm::{canonical_json, WormLedger};

use crate::error::{CaseError, CaseResult};
use crate::events::CaseEvent;

/// A standing instruction to silence matching alerts until it expires
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionRule {
    /// Scenario the rule applies to, e.g. `MIXER_PROXIMITY`
    pub scenario: String,
    /// Exact alert key, or a prefix ending in `*`
    pub key_pattern: String,
    pub reason: String,
    pub created_by: String,
    pub expires_at: DateTime<Utc>,
}

impl SuppressionRule {
    fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        at < self.expires_at
    }

    fn matches_key(&self, key: &str) -> bool {
        match self.key_pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == self.key_pattern,
        }
    }
}

/// Rule store consulted on every ingested alert
///
/// Reads vastly outnumber writes, so rules live behind an `RwLock`:
/// `should_suppress` takes a read lock, `add_rule` a write lock.
pub struct SuppressionService {
    ledger: Arc<WormLedger>,
    rules: RwLock<Vec<SuppressionRule>>,
}

impl SuppressionService {
    pub fn new(ledger: Arc<WormLedger>) -> Self {
        Self {
            ledger,
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Register a rule. Already-expired rules are refused.
    pub fn add_rule(&self, rule: SuppressionRule) -> CaseResult<()> {
        if rule.expires_at <= Utc::now() {
            return Err(CaseError::InvalidSuppressionRule(format!(
                "expiry {} is not in the future",
                rule.expires_at
            )));
        }

        self.ledger
            .append_event(&CaseEvent::SuppressionRuleAdded { rule: rule.clone() })?;

        tracing::info!(
            scenario = %rule.scenario,
            key_pattern = %rule.key_pattern,
            expires_at = %rule.expires_at,
            "Suppression rule added"
        );
        self.rules.write().unwrap().push(rule);
        Ok(())
    }

    /// Would this alert be suppressed right now?
    pub fn should_suppress(&self, alert: &SurveillanceAlert) -> Option<SuppressionRule> {
        self.should_suppress_at(alert, Utc::now())
    }

    /// Match against rules active at a given instant
    pub fn should_suppress_at(
        &self,
        alert: &SurveillanceAlert,
        at: DateTime<Utc>,
    ) -> Option<SuppressionRule> {
        self.rules
            .read()
            .unwrap()
            .iter()
            .find(|rule| {
                rule.is_active_at(at)
                    && rule.scenario == alert.scenario
                    && rule.matches_key(&alert.key)
            })
            .cloned()
    }

    /// Mark an alert suppressed, recording the action on the ledger first
    pub fn suppress(&self, alert: &mut SurveillanceAlert, rule: &SuppressionRule) -> CaseResult<()> {
        self.ledger.append_event(&CaseEvent::AlertSuppressed {
            alert_id: alert.id.clone(),
            scenario: alert.scenario.clone(),
            key: alert.key.clone(),
            reason: rule.reason.clone(),
        })?;

        alert.status = AlertStatus::Suppressed;
        tracing::debug!(
            alert_id = %alert.id,
            scenario = %alert.scenario,
            reason = %rule.reason,
            "Alert suppressed"
        );
        Ok(())
    }

    pub fn rules(&self) -> Vec<SuppressionRule> {
        self.rules.read().unwrap().clone()
    }

    /// Rebuild the rule set from ledger events
    pub fn replay(ledger: Arc<WormLedger>) -> Self {
        let mut rules = Vec::new();
        for block in ledger.all() {
            if block.payload_type() != Some("SUPPRESSION_RULE_ADDED") {
                continue;
            }
            match serde_json::from_value::<CaseEvent>(block.payload.clone()) {
                Ok(CaseEvent::SuppressionRuleAdded { rule }) => rules.push(rule),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(index = block.index, error = %e, "Skipping unreadable rule event")
                }
            }
        }
        tracing::debug!(rules = rules.len(), "Suppression rules replayed");
        Self {
            ledger,
            rules: RwLock::new(rules),
        }
    }
}

/// Collapses byte-identical alerts within one ingest batch
///
/// Two alerts are duplicates when scenario, key, and the canonical form
/// of their signal all agree. The first occurrence wins; later copies
/// are dropped before suppression and case correlation ever see them.
#[derive(Default)]
pub struct AlertDeduper;

impl AlertDeduper {
    pub fn new() -> Self {
        Self
    }

    pub fn filter(&self, alerts: Vec<SurveillanceAlert>) -> Vec<SurveillanceAlert> {
        let mut seen = std::collections::HashSet::new();
        let mut kept = Vec::with_capacity(alerts.len());
        for alert in alerts {
            let fingerprint = format!(
                "{}|{}|{}",
                alert.scenario,
                alert.key,
                canonical_json(&alert.signal)
            );
            if seen.insert(fingerprint) {
                kept.push(alert);
            } else {
                tracing::debug!(
                    alert_id = %alert.id,
                    scenario = %alert.scenario,
                    key = %alert.key,
                    "Duplicate alert dropped"
                );
            }
        }
        kept
    }
}
