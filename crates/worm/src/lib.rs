//! Vigil WORM - Tamper-evident audit ledger
//!
//! Write-once-read-many hash-chained ledger. Every surveillance decision
//! (case transitions, suppressions, retention sweeps, wall crossings) is
//! recorded here as a block; each block's hash covers its payload and the
//! previous block's hash, so any after-the-fact edit breaks the chain at
//! the edited block and at every block after it.
//!
//! # Key Types
//! - [`LedgerBlock`]: one immutable event in the chain
//! - [`WormLedger`]: single-writer append / read / verify surface
//! - [`BlockStore`]: pluggable persistence (in-memory or JSONL file)
//! - [`verify_chain`]: standalone chain verification

pub mod block;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod store;

pub use block::{LedgerBlock, GENESIS_HASH};
pub use error::{WormError, WormResult};
pub use hash::{block_hash, canonical_json, verify_chain, ChainError};
pub use ledger::WormLedger;
pub use store::{BlockStore, JsonlBlockStore, MemoryBlockStore};
