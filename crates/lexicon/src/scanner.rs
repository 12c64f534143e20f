//! Communication scanner

use regex::{Regex, RegexBuilder};
use serde_json::json;

use vigil_core::{AlertKind, Communication, SurveillanceAlert};

use crate::entry::LexiconEntry;
use crate::error::{LexiconError, LexiconResult};

struct CompiledEntry {
    category: String,
    regex: Regex,
    weight: u8,
}

/// Outcome of one scan pass
#[derive(Debug)]
pub struct LexiconScan {
    pub alerts: Vec<SurveillanceAlert>,
    pub scanned: usize,
}

/// Pattern scanner over communications
///
/// Patterns compile once at construction; a bad pattern fails the whole
/// engine up front rather than silently skipping entries at scan time.
pub struct LexiconEngine {
    entries: Vec<CompiledEntry>,
}

impl LexiconEngine {
    /// Compile an engine from lexicon entries
    pub fn new(entries: Vec<LexiconEntry>) -> LexiconResult<Self> {
        let compiled = entries
            .iter()
            .map(|entry| {
                let regex = RegexBuilder::new(&entry.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| LexiconError::InvalidPattern {
                        category: entry.category.clone(),
                        message: e.to_string(),
                    })?;
                Ok(CompiledEntry {
                    category: entry.category.clone(),
                    regex,
                    weight: entry.weight,
                })
            })
            .collect::<LexiconResult<Vec<_>>>()?;

        Ok(Self { entries: compiled })
    }

    /// Compile an engine over the stock seed entries
    pub fn with_seed() -> LexiconResult<Self> {
        Self::new(crate::entry::seed_lexicons())
    }

    /// Scan a batch of communications.
    ///
    /// One alert per (communication, category): when several patterns of the
    /// same category hit one message, only the highest-weight match survives.
    /// Different categories alert independently. The alert key is the
    /// sender, so repeated language from one person correlates to one case.
    pub fn scan_communications(&self, comms: &[Communication]) -> LexiconScan {
        let mut alerts = Vec::new();

        for comm in comms {
            let mut hits: Vec<(&str, u8, String)> = Vec::new();

            for entry in &self.entries {
                if let Some(m) = entry.regex.find(&comm.text) {
                    let snippet = m.as_str().to_string();
                    match hits
                        .iter()
                        .position(|(category, _, _)| *category == entry.category.as_str())
                    {
                        Some(i) if entry.weight > hits[i].1 => {
                            hits[i].1 = entry.weight;
                            hits[i].2 = snippet;
                        }
                        Some(_) => {}
                        None => hits.push((entry.category.as_str(), entry.weight, snippet)),
                    }
                }
            }

            for (category, weight, snippet) in hits {
                tracing::debug!(comm_id = %comm.id, category, weight, "Lexicon hit");
                alerts.push(SurveillanceAlert::new(
                    AlertKind::Comms,
                    category,
                    weight,
                    format!("sender|{}", comm.from),
                    json!({
                        "commId": comm.id,
                        "channel": comm.channel,
                        "snippet": snippet,
                    }),
                ));
            }
        }

        LexiconScan {
            alerts,
            scanned: comms.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{OFF_CHANNEL_COMMS, PROMISSORY_LANGUAGE};
    use chrono::Utc;
    use vigil_core::Channel;

    fn create_comm(id: &str, text: &str) -> Communication {
        Communication {
            id: id.to_string(),
            channel: Channel::Email,
            from: "advisor@blackroad".to_string(),
            to: vec!["client@x".to_string()],
            ts: Utc::now(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_promissory_and_off_channel_detected() {
        let engine = LexiconEngine::with_seed().unwrap();
        let comms = vec![
            create_comm("c1", "We guarantee a 10% return if you wire today."),
            create_comm("c2", "Let's text me on WhatsApp to discuss details."),
        ];

        let scan = engine.scan_communications(&comms);

        let promissory = scan
            .alerts
            .iter()
            .find(|a| a.scenario == PROMISSORY_LANGUAGE)
            .expect("promissory alert");
        assert!(promissory.severity > 70);

        let off_channel = scan
            .alerts
            .iter()
            .find(|a| a.scenario == OFF_CHANNEL_COMMS)
            .expect("off-channel alert");
        let snippet = off_channel.signal["snippet"].as_str().unwrap();
        assert!(snippet.to_lowercase().contains("whatsapp"));
    }

    #[test]
    fn test_same_category_keeps_highest_weight() {
        let engine = LexiconEngine::with_seed().unwrap();
        let comms = vec![create_comm(
            "c1",
            "This is risk-free and we guarantee a 12% return.",
        )];

        let scan = engine.scan_communications(&comms);

        let promissory: Vec<_> = scan
            .alerts
            .iter()
            .filter(|a| a.scenario == PROMISSORY_LANGUAGE)
            .collect();
        assert_eq!(promissory.len(), 1);
        assert_eq!(promissory[0].severity, 80);
    }

    #[test]
    fn test_categories_alert_independently() {
        let engine = LexiconEngine::with_seed().unwrap();
        let comms = vec![create_comm(
            "c1",
            "Guaranteed 8% return, ping me on telegram.",
        )];

        let scan = engine.scan_communications(&comms);
        assert_eq!(scan.alerts.len(), 2);
        assert_eq!(scan.scanned, 1);
    }

    #[test]
    fn test_clean_comm_produces_nothing() {
        let engine = LexiconEngine::with_seed().unwrap();
        let comms = vec![create_comm("c1", "Quarterly statement attached.")];

        let scan = engine.scan_communications(&comms);
        assert!(scan.alerts.is_empty());
    }

    #[test]
    fn test_alert_key_is_sender() {
        let engine = LexiconEngine::with_seed().unwrap();
        let comms = vec![create_comm("c1", "We guarantee a 10% return today.")];

        let scan = engine.scan_communications(&comms);
        assert_eq!(scan.alerts[0].key, "sender|advisor@blackroad");
        assert_eq!(scan.alerts[0].kind, AlertKind::Comms);
    }

    #[test]
    fn test_invalid_pattern_rejected_at_compile() {
        let entries = vec![LexiconEntry::new("BAD", "(unclosed", 50)];

        let result = LexiconEngine::new(entries);
        assert!(matches!(
            result,
            Err(LexiconError::InvalidPattern { category, .. }) if category == "BAD"
        ));
    }
}
