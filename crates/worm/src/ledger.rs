//! The WORM ledger
//!
//! Single-writer append-only ledger. Every append runs inside one mutex:
//! read the tip, assign the next index, chain the hash, persist, then
//! publish. Two concurrent appends can never fork the chain or reuse an
//! index.
//!
//! Integrity failures are fatal. Once verification fails on an instance,
//! the instance refuses all further appends; a persisted chain that fails
//! verification refuses to open at all.

use std::sync::Mutex;

use chrono::Utc;

use crate::block::{LedgerBlock, GENESIS_HASH};
use crate::error::{WormError, WormResult};
use crate::hash::{block_hash, verify_chain, ChainError};
use crate::store::{BlockStore, MemoryBlockStore};

struct LedgerState {
    blocks: Vec<LedgerBlock>,
    store: Box<dyn BlockStore>,
    compromised: bool,
}

/// Hash-chained append-only event ledger
pub struct WormLedger {
    state: Mutex<LedgerState>,
}

impl WormLedger {
    /// Create a ledger backed by an in-memory store
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                blocks: Vec::new(),
                store: Box::new(MemoryBlockStore::new()),
                compromised: false,
            }),
        }
    }

    /// Open a ledger over a persistent store.
    ///
    /// Loads the persisted chain and verifies it before accepting any
    /// writes; a chain that fails verification refuses to open, surfacing
    /// the first broken index via [`WormError::Integrity`].
    pub fn with_store(store: Box<dyn BlockStore>) -> WormResult<Self> {
        let blocks = store.load()?;
        verify_chain(&blocks)?;

        tracing::debug!(blocks = blocks.len(), "ledger opened");

        Ok(Self {
            state: Mutex::new(LedgerState {
                blocks,
                store,
                compromised: false,
            }),
        })
    }

    /// Append a payload as the next block in the chain.
    ///
    /// A failed append means the mutation did not happen: the block is
    /// neither persisted nor visible, and callers must not update derived
    /// state.
    pub fn append(&self, payload: serde_json::Value) -> WormResult<LedgerBlock> {
        let mut state = self.state.lock().unwrap();

        if state.compromised {
            return Err(WormError::ChainCompromised);
        }

        let prev_hash = state
            .blocks
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let index = state.blocks.len() as u64;
        let hash = block_hash(&payload, &prev_hash);

        let block = LedgerBlock {
            index,
            timestamp: Utc::now(),
            payload,
            prev_hash,
            hash,
        };

        state.store.append_block(&block)?;
        state.blocks.push(block.clone());

        tracing::debug!(
            index,
            payload_type = block.payload_type().unwrap_or("-"),
            "ledger block appended"
        );

        Ok(block)
    }

    /// Serialize an event and append it as the next block
    pub fn append_event<T: serde::Serialize>(&self, event: &T) -> WormResult<LedgerBlock> {
        let payload = serde_json::to_value(event)?;
        self.append(payload)
    }

    /// The full chain in index order
    pub fn all(&self) -> Vec<LedgerBlock> {
        self.state.lock().unwrap().blocks.clone()
    }

    /// Number of blocks in the chain
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-verify the whole chain.
    ///
    /// On failure the instance is marked compromised and every subsequent
    /// `append` fails with [`WormError::ChainCompromised`].
    pub fn verify(&self) -> Result<(), ChainError> {
        let mut state = self.state.lock().unwrap();
        match verify_chain(&state.blocks) {
            Ok(()) => Ok(()),
            Err(err) => {
                state.compromised = true;
                tracing::error!(
                    broken_at = err.broken_at_index(),
                    "ledger verification failed; appends halted"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonlBlockStore;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct FailingStore;

    impl BlockStore for FailingStore {
        fn append_block(&mut self, _block: &LedgerBlock) -> WormResult<()> {
            Err(WormError::Storage(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn load(&self) -> WormResult<Vec<LedgerBlock>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_append_chains_blocks() {
        let ledger = WormLedger::in_memory();

        let b0 = ledger.append(json!({"type": "A"})).unwrap();
        let b1 = ledger.append(json!({"type": "B"})).unwrap();
        let b2 = ledger.append(json!({"type": "C"})).unwrap();

        assert_eq!(b0.index, 0);
        assert_eq!(b0.prev_hash, GENESIS_HASH);
        assert_eq!(b1.prev_hash, b0.hash);
        assert_eq!(b2.prev_hash, b1.hash);
        assert_eq!(ledger.len(), 3);
        assert!(ledger.verify().is_ok());
    }

    #[test]
    fn test_failed_append_leaves_no_trace() {
        let ledger = WormLedger::with_store(Box::new(FailingStore)).unwrap();

        let result = ledger.append(json!({"type": "A"}));
        assert!(matches!(result, Err(WormError::Storage(_))));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_verify_failure_halts_appends() {
        let ledger = WormLedger::in_memory();
        ledger.append(json!({"type": "A"})).unwrap();
        ledger.append(json!({"type": "B"})).unwrap();

        ledger.state.lock().unwrap().blocks[1].payload = json!({"type": "TAMPERED"});

        let err = ledger.verify().unwrap_err();
        assert_eq!(err.broken_at_index(), 1);

        let result = ledger.append(json!({"type": "C"}));
        assert!(matches!(result, Err(WormError::ChainCompromised)));
    }

    #[test]
    fn test_reopen_persisted_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        let first = {
            let store = JsonlBlockStore::new(&path).unwrap();
            let ledger = WormLedger::with_store(Box::new(store)).unwrap();
            ledger.append(json!({"type": "A"})).unwrap();
            ledger.append(json!({"type": "B"})).unwrap();
            ledger.all()
        };

        let store = JsonlBlockStore::new(&path).unwrap();
        let reopened = WormLedger::with_store(Box::new(store)).unwrap();

        assert_eq!(reopened.all(), first);
        assert!(reopened.verify().is_ok());

        let b2 = reopened.append(json!({"type": "C"})).unwrap();
        assert_eq!(b2.index, 2);
        assert_eq!(b2.prev_hash, first[1].hash);
    }

    #[test]
    fn test_refuses_tampered_persisted_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        {
            let store = JsonlBlockStore::new(&path).unwrap();
            let ledger = WormLedger::with_store(Box::new(store)).unwrap();
            ledger.append(json!({"type": "A"})).unwrap();
            ledger.append(json!({"type": "B", "amount": 10})).unwrap();
        }

        // Rewrite block 1 with a doctored amount
        let text = std::fs::read_to_string(&path).unwrap();
        let doctored: Vec<String> = text
            .lines()
            .map(|line| {
                let mut block: LedgerBlock = serde_json::from_str(line).unwrap();
                if block.index == 1 {
                    block.payload = json!({"type": "B", "amount": 10_000});
                }
                serde_json::to_string(&block).unwrap()
            })
            .collect();
        std::fs::write(&path, doctored.join("\n")).unwrap();

        let store = JsonlBlockStore::new(&path).unwrap();
        let result = WormLedger::with_store(Box::new(store));
        match result {
            Err(WormError::Integrity(err)) => assert_eq!(err.broken_at_index(), 1),
            other => panic!("expected integrity failure, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_concurrent_appends_never_fork() {
        let ledger = Arc::new(WormLedger::in_memory());

        let handles: Vec<_> = (0..8)
            .map(|writer| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        ledger
                            .append(json!({"writer": writer, "seq": i}))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let blocks = ledger.all();
        assert_eq!(blocks.len(), 200);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.index, i as u64);
        }
        assert!(verify_chain(&blocks).is_ok());
    }
}
