//! Vigil CLI - Main entry point

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use vigil_worm::{verify_chain, BlockStore, JsonlBlockStore, LedgerBlock};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil - trade surveillance audit tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the hash chain of a ledger file
    Audit {
        /// Path to the JSONL ledger file
        #[arg(long)]
        ledger: PathBuf,
    },

    /// Print the newest ledger blocks
    Blocks {
        /// Path to the JSONL ledger file
        #[arg(long)]
        ledger: PathBuf,
        /// Maximum number of blocks to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Audit { ledger } => {
            let blocks = load_blocks(&ledger)?;
            match verify_chain(&blocks) {
                Ok(()) => {
                    println!("✅ Hash chain verified ({} blocks)", blocks.len());
                }
                Err(e) => {
                    println!("❌ Hash chain broken at index {}: {}", e.broken_at_index(), e);
                }
            }
        }

        Commands::Blocks { ledger, limit } => {
            let blocks = load_blocks(&ledger)?;
            let start = blocks.len().saturating_sub(limit);
            for block in &blocks[start..] {
                println!(
                    "{:>6}  {}  {}",
                    block.index,
                    block.timestamp.to_rfc3339(),
                    block.payload_type().unwrap_or("-")
                );
            }
            println!("({} of {} blocks)", blocks.len() - start, blocks.len());
        }
    }

    Ok(())
}

fn load_blocks(path: &Path) -> anyhow::Result<Vec<LedgerBlock>> {
    anyhow::ensure!(path.exists(), "ledger file not found: {}", path.display());
    let store = JsonlBlockStore::new(path)
        .with_context(|| format!("opening ledger {}", path.display()))?;
    let blocks = store
        .load()
        .with_context(|| format!("reading ledger {}", path.display()))?;
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vigil_worm::WormLedger;

    fn write_ledger(path: &Path) {
        let store = JsonlBlockStore::new(path).unwrap();
        let ledger = WormLedger::with_store(Box::new(store)).unwrap();
        ledger
            .append(json!({ "type": "CASE_CREATED", "case": { "id": "c1" } }))
            .unwrap();
        ledger
            .append(json!({ "type": "CASE_CLOSED", "caseId": "c1" }))
            .unwrap();
    }

    #[test]
    fn test_load_blocks_reads_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        write_ledger(&path);

        let blocks = load_blocks(&path).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(verify_chain(&blocks).is_ok());
        assert_eq!(blocks[1].payload_type(), Some("CASE_CLOSED"));
    }

    #[test]
    fn test_load_blocks_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.jsonl");

        assert!(load_blocks(&path).is_err());
    }

    #[test]
    fn test_audit_detects_doctored_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        write_ledger(&path);

        // rewrite the first block's payload in place
        let contents = std::fs::read_to_string(&path).unwrap();
        let doctored = contents.replace("CASE_CREATED", "CASE_DELETED");
        std::fs::write(&path, doctored).unwrap();

        let blocks = load_blocks(&path).unwrap();
        let err = verify_chain(&blocks).unwrap_err();
        assert_eq!(err.broken_at_index(), 0);
    }
}
