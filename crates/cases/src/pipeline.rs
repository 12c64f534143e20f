//! Alert intake pipeline
//!
//! Front door for raw detector output. Each batch passes through four
//! stages: validation, batch deduplication, suppression, and case
//! correlation. An alert stops at the first stage that claims it, and the
//! pipeline reports one [`AlertOutcome`] per input alert.

use std::collections::HashSet;
use std::sync::Arc;

use vigil_core::{validate_alert, SurveillanceAlert};

use crate::error::CaseResult;
use crate::service::CaseService;
use crate::suppression::{AlertDeduper, SuppressionService};

/// Where an ingested alert ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Rejected by validation, never reached the ledger
    Invalid { alert_id: String, reason: String },
    /// Dropped as a byte-identical copy of an earlier alert in the batch
    Deduplicated { alert_id: String },
    /// Silenced by an active suppression rule
    Suppressed { alert_id: String },
    /// Linked into a case
    Linked { alert_id: String, case_id: String },
}

impl AlertOutcome {
    pub fn alert_id(&self) -> &str {
        match self {
            AlertOutcome::Invalid { alert_id, .. }
            | AlertOutcome::Deduplicated { alert_id }
            | AlertOutcome::Suppressed { alert_id }
            | AlertOutcome::Linked { alert_id, .. } => alert_id,
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, AlertOutcome::Linked { .. })
    }
}

/// Validate -> dedup -> suppress -> correlate
pub struct AlertPipeline {
    deduper: AlertDeduper,
    suppression: Arc<SuppressionService>,
    cases: Arc<CaseService>,
}

impl AlertPipeline {
    pub fn new(suppression: Arc<SuppressionService>, cases: Arc<CaseService>) -> Self {
        Self {
            deduper: AlertDeduper::new(),
            suppression,
            cases,
        }
    }

    /// Run one batch through all four stages.
    ///
    /// Outcomes are grouped by stage rather than input order; match them
    /// back by [`AlertOutcome::alert_id`].
    pub fn ingest_batch(&self, alerts: Vec<SurveillanceAlert>) -> CaseResult<Vec<AlertOutcome>> {
        let mut outcomes = Vec::with_capacity(alerts.len());

        let mut valid = Vec::with_capacity(alerts.len());
        for alert in alerts {
            match validate_alert(&alert) {
                Ok(()) => valid.push(alert),
                Err(e) => {
                    tracing::warn!(alert_id = %alert.id, error = %e, "Alert rejected");
                    outcomes.push(AlertOutcome::Invalid {
                        alert_id: alert.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let candidate_ids: Vec<String> = valid.iter().map(|a| a.id.clone()).collect();
        let kept = self.deduper.filter(valid);
        {
            let kept_ids: HashSet<&str> = kept.iter().map(|a| a.id.as_str()).collect();
            for id in candidate_ids {
                if !kept_ids.contains(id.as_str()) {
                    outcomes.push(AlertOutcome::Deduplicated { alert_id: id });
                }
            }
        }

        for mut alert in kept {
            if let Some(rule) = self.suppression.should_suppress(&alert) {
                self.suppression.suppress(&mut alert, &rule)?;
                outcomes.push(AlertOutcome::Suppressed { alert_id: alert.id });
                continue;
            }
            let case = self.cases.ingest_alert(alert.clone())?;
            outcomes.push(AlertOutcome::Linked {
                alert_id: alert.id,
                case_id: case.id,
            });
        }

        tracing::debug!(
            linked = outcomes.iter().filter(|o| o.is_linked()).count(),
            total = outcomes.len(),
            "Alert batch processed"
        );
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::CaseRepository;
    use crate::suppression::SuppressionRule;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use vigil_core::AlertKind;
    use vigil_worm::WormLedger;

    struct Fixture {
        pipeline: AlertPipeline,
        suppression: Arc<SuppressionService>,
        cases: Arc<CaseService>,
        ledger: Arc<WormLedger>,
    }

    fn create_fixture() -> Fixture {
        let ledger = Arc::new(WormLedger::in_memory());
        let suppression = Arc::new(SuppressionService::new(Arc::clone(&ledger)));
        let cases = Arc::new(CaseService::new(CaseRepository::new(), Arc::clone(&ledger)));
        Fixture {
            pipeline: AlertPipeline::new(Arc::clone(&suppression), Arc::clone(&cases)),
            suppression,
            cases,
            ledger,
        }
    }

    fn mixer_alert(wallet: &str) -> SurveillanceAlert {
        SurveillanceAlert::new(
            AlertKind::Crypto,
            "MIXER_PROXIMITY",
            85,
            format!("wallet|{wallet}"),
            json!({ "wallet": wallet, "distance": 2 }),
        )
    }

    fn outcome_for<'a>(outcomes: &'a [AlertOutcome], alert_id: &str) -> &'a AlertOutcome {
        outcomes
            .iter()
            .find(|o| o.alert_id() == alert_id)
            .expect("missing outcome")
    }

    #[test]
    fn test_clean_alerts_reach_cases() {
        let f = create_fixture();
        let alert = mixer_alert("0xabc");
        let alert_id = alert.id.clone();

        let outcomes = f.pipeline.ingest_batch(vec![alert]).unwrap();

        match outcome_for(&outcomes, &alert_id) {
            AlertOutcome::Linked { case_id, .. } => {
                assert!(f.cases.get_case(case_id).is_ok());
            }
            other => panic!("expected link, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_alert_stops_at_validation() {
        let f = create_fixture();
        let mut alert = mixer_alert("0xabc");
        alert.id = String::new();

        let outcomes = f.pipeline.ingest_batch(vec![alert]).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], AlertOutcome::Invalid { .. }));
        assert!(f.cases.list_cases().is_empty());
        assert!(f.ledger.is_empty());
    }

    #[test]
    fn test_duplicates_collapse_before_correlation() {
        let f = create_fixture();
        let first = mixer_alert("0xabc");
        let second = mixer_alert("0xabc");
        let first_id = first.id.clone();
        let second_id = second.id.clone();

        let outcomes = f.pipeline.ingest_batch(vec![first, second]).unwrap();

        assert!(outcome_for(&outcomes, &first_id).is_linked());
        assert!(matches!(
            outcome_for(&outcomes, &second_id),
            AlertOutcome::Deduplicated { .. }
        ));
        let cases = f.cases.list_cases();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].alerts.len(), 1);
    }

    #[test]
    fn test_suppressed_alert_never_reaches_cases() {
        let f = create_fixture();
        f.suppression
            .add_rule(SuppressionRule {
                scenario: "MIXER_PROXIMITY".to_string(),
                key_pattern: "wallet|0xabc".to_string(),
                reason: "Known exchange hot wallet".to_string(),
                created_by: "compliance-lead".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            })
            .unwrap();
        let alert = mixer_alert("0xabc");
        let alert_id = alert.id.clone();

        let outcomes = f.pipeline.ingest_batch(vec![alert]).unwrap();

        assert!(matches!(
            outcome_for(&outcomes, &alert_id),
            AlertOutcome::Suppressed { .. }
        ));
        assert!(f.cases.list_cases().is_empty());
        let types: Vec<_> = f
            .ledger
            .all()
            .iter()
            .filter_map(|b| b.payload_type().map(str::to_string))
            .collect();
        assert_eq!(types, vec!["SUPPRESSION_RULE_ADDED", "ALERT_SUPPRESSED"]);
    }

    #[test]
    fn test_mixed_batch_reports_every_alert() {
        let f = create_fixture();
        f.suppression
            .add_rule(SuppressionRule {
                scenario: "MIXER_PROXIMITY".to_string(),
                key_pattern: "wallet|0xsuppressed".to_string(),
                reason: "Treasury wallet".to_string(),
                created_by: "compliance-lead".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            })
            .unwrap();

        let linked = mixer_alert("0xabc");
        let duplicate = mixer_alert("0xabc");
        let suppressed = mixer_alert("0xsuppressed");
        let mut invalid = mixer_alert("0xdef");
        invalid.id = String::new();

        let outcomes = f
            .pipeline
            .ingest_batch(vec![linked, duplicate, suppressed, invalid])
            .unwrap();

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes.iter().filter(|o| o.is_linked()).count(), 1);
    }
}
