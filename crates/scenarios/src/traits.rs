//! Detector trait - the interface every scenario implements

use async_trait::async_trait;

use vigil_core::SurveillanceAlert;

use crate::context::DetectionContext;
use crate::error::DetectorResult;

/// A surveillance scenario detector
///
/// Detectors are pure over the context snapshot: same context in, same
/// alerts out. They must not hold mutable state across runs; thresholds
/// belong in [`crate::config::DetectorConfig`].
///
/// Return `Ok(vec![])` when nothing matches. Return `Err(_)` only for a
/// genuine detector failure; the engine logs it and keeps running the
/// other detectors.
#[async_trait]
pub trait ScenarioDetector: Send + Sync {
    /// Scenario name for alerts and logging (e.g. `"WASH_TRADE"`)
    fn name(&self) -> &str;

    /// Examine the snapshot and return any alerts it warrants
    async fn detect(&self, ctx: &DetectionContext) -> DetectorResult<Vec<SurveillanceAlert>>;
}

/// A detector that never alerts (for testing)
pub struct NoOpDetector;

#[async_trait]
impl ScenarioDetector for NoOpDetector {
    fn name(&self) -> &str {
        "NO_OP"
    }

    async fn detect(&self, _ctx: &DetectionContext) -> DetectorResult<Vec<SurveillanceAlert>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_detector() {
        let detector = NoOpDetector;
        let ctx = DetectionContext::new();

        let alerts = detector.detect(&ctx).await.unwrap();
        assert!(alerts.is_empty());
        assert_eq!(detector.name(), "NO_OP");
    }
}
