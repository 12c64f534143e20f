//! Ledger blocks
//!
//! A block wraps one event payload and chains it to its predecessor by
//! hash. Blocks are write-once: after `append` returns, nothing may update
//! or delete a block without invalidating every hash after it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `prev_hash` of block 0
pub const GENESIS_HASH: &str = "GENESIS";

/// One immutable entry in the hash chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerBlock {
    /// Strictly increasing from 0
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    /// The event being recorded, as written by the producing service
    pub payload: serde_json::Value,
    /// Hash of the previous block, or [`GENESIS_HASH`] for block 0
    pub prev_hash: String,
    /// `hex(sha256(canonical_json(payload) || prev_hash))`
    pub hash: String,
}

impl LedgerBlock {
    /// The payload's `type` tag, if the payload is a tagged event object
    pub fn payload_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_type() {
        let block = LedgerBlock {
            index: 0,
            timestamp: Utc::now(),
            payload: json!({"type": "CASE_CREATED", "caseId": "c1"}),
            prev_hash: GENESIS_HASH.to_string(),
            hash: "h".to_string(),
        };

        assert_eq!(block.payload_type(), Some("CASE_CREATED"));
    }

    #[test]
    fn test_payload_type_absent_for_untagged() {
        let block = LedgerBlock {
            index: 0,
            timestamp: Utc::now(),
            payload: json!([1, 2, 3]),
            prev_hash: GENESIS_HASH.to_string(),
            hash: "h".to_string(),
        };

        assert_eq!(block.payload_type(), None);
    }
}
