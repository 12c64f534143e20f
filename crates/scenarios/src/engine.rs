//! Scenario engine - runs every registered detector over a snapshot

use std::sync::Arc;

use vigil_core::SurveillanceAlert;

use crate::config::DetectorConfig;
use crate::context::DetectionContext;
use crate::detectors::{FrontRunningDetector, MixerProximityDetector, WashTradeDetector};
use crate::error::DetectorError;
use crate::traits::ScenarioDetector;

/// A detector that failed during a run
#[derive(Debug)]
pub struct DetectorFailure {
    pub detector: String,
    pub error: DetectorError,
}

/// Outcome of one engine run
///
/// `alerts` holds everything the surviving detectors produced; `failures`
/// holds one entry per detector that errored. A failure never suppresses
/// the other detectors' alerts.
#[derive(Debug, Default)]
pub struct ScenarioRun {
    pub alerts: Vec<SurveillanceAlert>,
    pub failures: Vec<DetectorFailure>,
}

impl ScenarioRun {
    /// True when every registered detector completed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registry of scenario detectors
pub struct ScenarioEngine {
    detectors: Vec<Arc<dyn ScenarioDetector>>,
}

impl Default for ScenarioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Create an engine with the three built-in detectors at default
    /// thresholds
    pub fn with_defaults() -> Self {
        Self::with_config(&DetectorConfig::default())
    }

    /// Create an engine with the built-in detectors at the given thresholds
    pub fn with_config(config: &DetectorConfig) -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(WashTradeDetector::new(config)));
        engine.register(Arc::new(FrontRunningDetector::new(config)));
        engine.register(Arc::new(MixerProximityDetector::new(config)));
        engine
    }

    /// Register a detector
    pub fn register(&mut self, detector: Arc<dyn ScenarioDetector>) {
        self.detectors.push(detector);
    }

    /// Names of every registered detector, in registration order
    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every detector over the snapshot.
    ///
    /// Detectors run collect-and-continue: a failing detector is logged and
    /// reported in [`ScenarioRun::failures`] without stopping the others.
    pub async fn run(&self, ctx: &DetectionContext) -> ScenarioRun {
        let mut run = ScenarioRun::default();

        for detector in &self.detectors {
            match detector.detect(ctx).await {
                Ok(alerts) => {
                    tracing::debug!(
                        detector = detector.name(),
                        alerts = alerts.len(),
                        "Detector completed"
                    );
                    run.alerts.extend(alerts);
                }
                Err(e) => {
                    tracing::error!(
                        detector = detector.name(),
                        error = %e,
                        "Detector failed; continuing with remaining detectors"
                    );
                    run.failures.push(DetectorFailure {
                        detector: detector.name().to_string(),
                        error: e,
                    });
                }
            }
        }

        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{MIXER_PROXIMITY, WASH_TRADE};
    use crate::error::DetectorResult;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use vigil_core::{AssetType, RiskLevel, ScreeningNode, Trade, TradeSide, TransferDirection, WalletTransfer};

    struct FailingDetector;

    #[async_trait]
    impl ScenarioDetector for FailingDetector {
        fn name(&self) -> &str {
            "FAILING"
        }

        async fn detect(&self, _ctx: &DetectionContext) -> DetectorResult<Vec<SurveillanceAlert>> {
            Err(DetectorError::Internal("screening service down".to_string()))
        }
    }

    fn wash_pair_context() -> DetectionContext {
        let now = Utc::now();
        let buy = Trade {
            id: "t1".to_string(),
            account_id: "A1".to_string(),
            household_id: Some("H1".to_string()),
            rep_id: "R1".to_string(),
            symbol: "BRF".to_string(),
            asset_type: AssetType::Equity,
            side: TradeSide::Buy,
            quantity: dec!(500),
            price: dec!(10),
            executed_at: now,
            is_employee_account: false,
        };
        let mut sell = buy.clone();
        sell.id = "t2".to_string();
        sell.side = TradeSide::Sell;
        sell.price = dec!(10.1);
        sell.executed_at = now + Duration::minutes(2);

        DetectionContext::new().with_trades(vec![buy, sell])
    }

    fn mixer_context() -> DetectionContext {
        DetectionContext::new().with_transfers(vec![WalletTransfer {
            id: "w1".to_string(),
            wallet: "0xabc".to_string(),
            asset: "USDC".to_string(),
            direction: TransferDirection::In,
            amount: dec!(12000),
            tx_hash: "0x123".to_string(),
            timestamp: Utc::now(),
            screening_path: vec![ScreeningNode {
                address: "0xmix".to_string(),
                tag: "Mixer Hub".to_string(),
                risk_level: RiskLevel::Severe,
                distance: 2,
            }],
        }])
    }

    #[test]
    fn test_with_defaults_registers_builtins() {
        let engine = ScenarioEngine::with_defaults();
        assert_eq!(
            engine.detector_names(),
            vec!["WASH_TRADE", "FRONT_RUN", "MIXER_PROXIMITY"]
        );
    }

    #[tokio::test]
    async fn test_run_collects_across_detectors() {
        let mut ctx = wash_pair_context();
        ctx.wallet_transfers = mixer_context().wallet_transfers;

        let engine = ScenarioEngine::with_defaults();
        let run = engine.run(&ctx).await;

        assert!(run.is_clean());
        let scenarios: Vec<&str> = run.alerts.iter().map(|a| a.scenario.as_str()).collect();
        assert!(scenarios.contains(&WASH_TRADE));
        assert!(scenarios.contains(&MIXER_PROXIMITY));
    }

    #[tokio::test]
    async fn test_failing_detector_does_not_stop_run() {
        let mut engine = ScenarioEngine::new();
        engine.register(Arc::new(FailingDetector));
        engine.register(Arc::new(WashTradeDetector::new(&DetectorConfig::default())));

        let run = engine.run(&wash_pair_context()).await;

        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].detector, "FAILING");
        assert_eq!(run.alerts.len(), 1);
        assert_eq!(run.alerts[0].scenario, WASH_TRADE);
    }

    #[tokio::test]
    async fn test_empty_context_yields_no_alerts() {
        let engine = ScenarioEngine::with_defaults();
        let run = engine.run(&DetectionContext::new()).await;

        assert!(run.is_clean());
        assert!(run.alerts.is_empty());
    }
}
