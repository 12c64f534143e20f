//! Wallet-transfer feed types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Direction of a wallet transfer relative to the custodied wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferDirection {
    In,
    Out,
}

/// Screening risk level attached to a counterparty node, ordered from
/// lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Severe,
}

impl RiskLevel {
    fn rank(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Severe => 3,
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// One node on the chain-analysis path between the wallet and a tagged
/// counterparty. `distance` counts hops from the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningNode {
    pub address: String,
    /// Analyst tag, e.g. "Mixer Hub" or "Sanctioned"
    pub tag: String,
    pub risk_level: RiskLevel,
    pub distance: u32,
}

/// A wallet transfer from the upstream crypto feed, annotated with the
/// screening path produced by the chain-analysis collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransfer {
    pub id: String,
    pub wallet: String,
    pub asset: String,
    pub direction: TransferDirection,
    pub amount: Decimal,
    pub tx_hash: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub screening_path: Vec<ScreeningNode>,
}
