//! Detection context - the immutable snapshot detectors run over

use vigil_core::{Trade, WalletTransfer};

/// One batch of feed records handed to every detector.
///
/// Detectors are pure functions over this snapshot; nothing mutates it
/// during a run, so detectors may execute in any order or in parallel.
#[derive(Debug, Clone, Default)]
pub struct DetectionContext {
    pub trades: Vec<Trade>,
    pub wallet_transfers: Vec<WalletTransfer>,
}

impl DetectionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trade batch
    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }

    /// Set the wallet transfer batch
    pub fn with_transfers(mut self, transfers: Vec<WalletTransfer>) -> Self {
        self.wallet_transfers = transfers;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty() && self.wallet_transfers.is_empty()
    }
}
