//! Lexicon entries and the stock seed set

use serde::{Deserialize, Serialize};

/// Category for language that promises investment outcomes
pub const PROMISSORY_LANGUAGE: &str = "PROMISSORY_LANGUAGE";

/// Category for attempts to move a conversation off supervised channels
pub const OFF_CHANNEL_COMMS: &str = "OFF_CHANNEL_COMMS";

/// One scannable pattern.
///
/// `pattern` is a regex; matching is made case-insensitive at compile time.
/// `weight` becomes the severity of any alert the pattern raises.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexiconEntry {
    pub category: String,
    pub pattern: String,
    pub weight: u8,
}

impl LexiconEntry {
    pub fn new(category: impl Into<String>, pattern: impl Into<String>, weight: u8) -> Self {
        Self {
            category: category.into(),
            pattern: pattern.into(),
            weight,
        }
    }
}

/// The stock lexicon entries
pub fn seed_lexicons() -> Vec<LexiconEntry> {
    vec![
        // Promissory / guaranteed-outcome language
        LexiconEntry::new(
            PROMISSORY_LANGUAGE,
            r"guarantee[sd]?\s+(?:a\s+)?[\w.]+%?\s*return",
            80,
        ),
        LexiconEntry::new(PROMISSORY_LANGUAGE, r"risk[-\s]?free", 78),
        LexiconEntry::new(PROMISSORY_LANGUAGE, r"can(?:no|')t\s+lose", 76),
        LexiconEntry::new(PROMISSORY_LANGUAGE, r"promise[sd]?\s+.*(?:profit|return)", 75),
        // Off-channel steering
        LexiconEntry::new(OFF_CHANNEL_COMMS, r"whats\s?app", 65),
        LexiconEntry::new(OFF_CHANNEL_COMMS, r"telegram", 65),
        LexiconEntry::new(OFF_CHANNEL_COMMS, r"text\s+me\s+(?:at|on)", 62),
        LexiconEntry::new(OFF_CHANNEL_COMMS, r"personal\s+(?:email|cell|phone)", 60),
    ]
}
