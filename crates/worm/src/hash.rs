//! Hash chain utilities for ledger integrity

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::block::{LedgerBlock, GENESIS_HASH};

/// Serialize a JSON value with object keys sorted at every nesting level.
///
/// Every payload has exactly one canonical byte representation, so the same
/// payload always hashes to the same value regardless of how its map was
/// built. Arrays keep their order; scalars serialize as plain JSON.
pub fn canonical_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Object(map) => {
            out.push('{');
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Calculate the hash of a block from its payload and predecessor hash
pub fn block_hash(payload: &serde_json::Value, prev_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(payload).as_bytes());
    hasher.update(prev_hash.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify hash chain integrity
///
/// Recomputes every block hash from its payload and the previous block's
/// hash (the genesis constant for block 0) and checks that indices run
/// 0, 1, 2, ... without gaps. Returns the first divergence found.
pub fn verify_chain(blocks: &[LedgerBlock]) -> Result<(), ChainError> {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (i, block) in blocks.iter().enumerate() {
        // Verify prev_hash links correctly
        if block.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                index: block.index,
                expected: prev_hash,
                actual: block.prev_hash.clone(),
            });
        }

        // Verify hash matches the payload
        let calculated = block_hash(&block.payload, &block.prev_hash);
        if block.hash != calculated {
            return Err(ChainError::InvalidHash {
                index: block.index,
                expected: calculated,
                actual: block.hash.clone(),
            });
        }

        // Verify index is the next in sequence
        if block.index != i as u64 {
            return Err(ChainError::NonMonotonicIndex {
                expected: i as u64,
                actual: block.index,
            });
        }

        prev_hash = block.hash.clone();
    }

    Ok(())
}

/// Errors in hash chain verification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Broken link at block {index}: expected prev_hash '{expected}', got '{actual}'")]
    BrokenLink {
        index: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at block {index}: expected '{expected}', got '{actual}'")]
    InvalidHash {
        index: u64,
        expected: String,
        actual: String,
    },

    #[error("Non-monotonic index: expected {expected}, got {actual}")]
    NonMonotonicIndex { expected: u64, actual: u64 },
}

impl ChainError {
    /// The index where the chain first diverges
    pub fn broken_at_index(&self) -> u64 {
        match self {
            ChainError::BrokenLink { index, .. } => *index,
            ChainError::InvalidHash { index, .. } => *index,
            ChainError::NonMonotonicIndex { expected, .. } => *expected,
        }
    }
}
