//! Block storage backends
//!
//! The ledger persists blocks through a [`BlockStore`]. Two backends ship
//! here: an in-memory store for tests and embedding, and a JSONL file store
//! (one JSON block per line, append-only, flushed per write).

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::block::LedgerBlock;
use crate::error::WormResult;

/// Durable backing for ledger blocks
pub trait BlockStore: Send {
    /// Persist one block. The block is only considered committed once this
    /// returns Ok.
    fn append_block(&mut self, block: &LedgerBlock) -> WormResult<()>;

    /// Load every persisted block in index order
    fn load(&self) -> WormResult<Vec<LedgerBlock>>;
}

/// In-memory block store
#[derive(Default)]
pub struct MemoryBlockStore {
    blocks: Vec<LedgerBlock>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStore for MemoryBlockStore {
    fn append_block(&mut self, block: &LedgerBlock) -> WormResult<()> {
        self.blocks.push(block.clone());
        Ok(())
    }

    fn load(&self) -> WormResult<Vec<LedgerBlock>> {
        Ok(self.blocks.clone())
    }
}

/// Append-only JSONL block store
///
/// Each line is one JSON-serialized [`LedgerBlock`]. The file should never
/// be modified by anything other than `append_block`.
pub struct JsonlBlockStore {
    path: PathBuf,
    file: File,
}

impl JsonlBlockStore {
    /// Open (or create) a block file at the given path
    pub fn new(path: impl AsRef<Path>) -> WormResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlockStore for JsonlBlockStore {
    fn append_block(&mut self, block: &LedgerBlock) -> WormResult<()> {
        let json = serde_json::to_string(block)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()?;
        Ok(())
    }

    fn load(&self) -> WormResult<Vec<LedgerBlock>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut blocks = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let block: LedgerBlock = serde_json::from_str(&line)?;
            blocks.push(block);
        }

        Ok(blocks)
    }
}
