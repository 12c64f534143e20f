//! Built-in scenario detectors
//!
//! The three stock detectors every deployment starts from:
//! - [`WashTradeDetector`] - opposing trades in one account (Trading)
//! - [`FrontRunningDetector`] - rep trades ahead of a client (Trading)
//! - [`MixerProximityDetector`] - wallet near a severe-risk node (Crypto)

use async_trait::async_trait;
use serde_json::json;

use vigil_core::{AlertKind, RiskLevel, SurveillanceAlert, TradeSide};

use crate::config::DetectorConfig;
use crate::context::DetectionContext;
use crate::error::DetectorResult;
use crate::traits::ScenarioDetector;

pub const WASH_TRADE: &str = "WASH_TRADE";
pub const FRONT_RUN: &str = "FRONT_RUN";
pub const MIXER_PROXIMITY: &str = "MIXER_PROXIMITY";

pub const WASH_TRADE_SEVERITY: u8 = 75;
pub const FRONT_RUN_SEVERITY: u8 = 78;
pub const MIXER_PROXIMITY_SEVERITY: u8 = 85;

// =============================================================================
// WashTradeDetector
// =============================================================================

/// Wash trade detector
///
/// Flags pairs of trades in the same account and symbol on opposite sides
/// executed within the configured window. Each qualifying pair produces one
/// alert keyed by `"<account>|<symbol>|<buy_id>|<sell_id>"`.
pub struct WashTradeDetector {
    window: chrono::Duration,
}

impl WashTradeDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            window: config.wash_window(),
        }
    }
}

#[async_trait]
impl ScenarioDetector for WashTradeDetector {
    fn name(&self) -> &str {
        WASH_TRADE
    }

    async fn detect(&self, ctx: &DetectionContext) -> DetectorResult<Vec<SurveillanceAlert>> {
        let mut alerts = Vec::new();

        for (i, first) in ctx.trades.iter().enumerate() {
            for second in &ctx.trades[i + 1..] {
                if first.account_id != second.account_id || first.symbol != second.symbol {
                    continue;
                }
                if first.side == second.side {
                    continue;
                }
                let gap = (second.executed_at - first.executed_at).abs();
                if gap > self.window {
                    continue;
                }

                let (buy, sell) = if first.side == TradeSide::Buy {
                    (first, second)
                } else {
                    (second, first)
                };
                let key = format!("{}|{}|{}|{}", buy.account_id, buy.symbol, buy.id, sell.id);

                alerts.push(SurveillanceAlert::new(
                    AlertKind::Trading,
                    WASH_TRADE,
                    WASH_TRADE_SEVERITY,
                    key,
                    json!({
                        "symbol": buy.symbol,
                        "accountId": buy.account_id,
                        "buyTradeId": buy.id,
                        "sellTradeId": sell.id,
                        "secondsApart": gap.num_seconds(),
                    }),
                ));
            }
        }

        Ok(alerts)
    }
}

// =============================================================================
// FrontRunningDetector
// =============================================================================

/// Front-running detector
///
/// Flags an employee-account trade followed within the configured window by
/// a client trade on the same symbol under the same rep, where the client
/// fills at a worse price than the employee did (higher for a client BUY,
/// lower for a client SELL).
pub struct FrontRunningDetector {
    window: chrono::Duration,
}

impl FrontRunningDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            window: config.front_run_window(),
        }
    }
}

#[async_trait]
impl ScenarioDetector for FrontRunningDetector {
    fn name(&self) -> &str {
        FRONT_RUN
    }

    async fn detect(&self, ctx: &DetectionContext) -> DetectorResult<Vec<SurveillanceAlert>> {
        let mut alerts = Vec::new();

        for employee in ctx.trades.iter().filter(|t| t.is_employee_account) {
            for client in ctx.trades.iter().filter(|t| !t.is_employee_account) {
                if employee.symbol != client.symbol || employee.rep_id != client.rep_id {
                    continue;
                }
                // Client must fill strictly after the employee, inside the window
                let gap = client.executed_at - employee.executed_at;
                if gap <= chrono::Duration::zero() || gap > self.window {
                    continue;
                }
                let worse_fill = match client.side {
                    TradeSide::Buy => client.price > employee.price,
                    TradeSide::Sell => client.price < employee.price,
                };
                if !worse_fill {
                    continue;
                }

                let key = format!("rep|{}|{}|{}", employee.rep_id, employee.id, client.id);

                alerts.push(SurveillanceAlert::new(
                    AlertKind::Trading,
                    FRONT_RUN,
                    FRONT_RUN_SEVERITY,
                    key,
                    json!({
                        "repId": employee.rep_id,
                        "symbol": employee.symbol,
                        "employeeTradeId": employee.id,
                        "clientTradeId": client.id,
                        "employeePrice": employee.price,
                        "clientPrice": client.price,
                    }),
                ));
            }
        }

        Ok(alerts)
    }
}

// =============================================================================
// MixerProximityDetector
// =============================================================================

/// Mixer proximity detector
///
/// Flags a wallet transfer whose screening path contains a severe-risk node
/// within the configured hop distance. The alert's `signal.closest` carries
/// the nearest qualifying node.
pub struct MixerProximityDetector {
    max_distance: u32,
}

impl MixerProximityDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            max_distance: config.mixer_max_distance,
        }
    }
}

#[async_trait]
impl ScenarioDetector for MixerProximityDetector {
    fn name(&self) -> &str {
        MIXER_PROXIMITY
    }

    async fn detect(&self, ctx: &DetectionContext) -> DetectorResult<Vec<SurveillanceAlert>> {
        let mut alerts = Vec::new();

        for transfer in &ctx.wallet_transfers {
            let closest = transfer
                .screening_path
                .iter()
                .filter(|node| {
                    node.risk_level == RiskLevel::Severe && node.distance <= self.max_distance
                })
                .min_by_key(|node| node.distance);

            if let Some(node) = closest {
                alerts.push(SurveillanceAlert::new(
                    AlertKind::Crypto,
                    MIXER_PROXIMITY,
                    MIXER_PROXIMITY_SEVERITY,
                    format!("wallet|{}", transfer.wallet),
                    json!({
                        "wallet": transfer.wallet,
                        "txHash": transfer.tx_hash,
                        "closest": node,
                    }),
                ));
            }
        }

        Ok(alerts)
    }
}

// =============================================================================
// Tests
// =============================================================================
