//! Trade feed types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// The opposing side (BUY <-> SELL)
    pub fn opposite(&self) -> TradeSide {
        match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        }
    }
}

/// Asset class of the traded instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Equity,
    Etf,
    MutualFund,
    Option,
    Bond,
    Crypto,
}

/// A single executed trade from the upstream trade feed.
///
/// Trades are read-only inputs to the surveillance core: detectors and the
/// insider gate inspect them but never mutate or persist them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub account_id: String,
    #[serde(default)]
    pub household_id: Option<String>,
    /// Registered representative who placed the trade
    pub rep_id: String,
    pub symbol: String,
    pub asset_type: AssetType,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub executed_at: DateTime<Utc>,
    /// True for proprietary / employee accounts
    #[serde(default)]
    pub is_employee_account: bool,
}
