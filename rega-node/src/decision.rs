use rega_core::SensorSnapshot;

use crate::config::DecisionConfig;

/// One evaluation of the irrigation rule.
///
/// Derived fresh each time; never persisted and never fed back into the
/// next evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrrigationDecision {
    /// 0-4 sum of the independent local risk conditions.
    pub severity: u8,
    /// Local fallback decision: severity >= 2.
    pub local: bool,
    /// Remote boolean, when this cycle's decision check produced one.
    pub remote: Option<bool>,
    /// The fused value that drives the relay.
    pub irrigate: bool,
}

/// Combines the local threshold rule with the remote decision.
///
/// The remote service is the authority: a decoded remote boolean from
/// this cycle overrides the local rule entirely, even when they
/// disagree. Without one, the local rule stands unmodified.
pub struct DecisionEngine {
    thresholds: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(thresholds: DecisionConfig) -> Self {
        Self { thresholds }
    }

    pub fn evaluate(&self, snapshot: &SensorSnapshot, remote: Option<bool>) -> IrrigationDecision {
        let severity = self.severity(snapshot);
        let local = severity >= 2;
        let irrigate = remote.unwrap_or(local);

        IrrigationDecision {
            severity,
            local,
            remote,
            irrigate,
        }
    }

    /// Sum of the four independent risk conditions. An unavailable
    /// reading satisfies no condition.
    fn severity(&self, snapshot: &SensorSnapshot) -> u8 {
        let mut severity = 0u8;
        severity += u8::from(!snapshot.phosphorus_present);
        severity += u8::from(!snapshot.potassium_present);
        severity += u8::from(
            snapshot
                .light_raw
                .is_some_and(|lux| lux > self.thresholds.bright_light_raw),
        );
        severity += u8::from(
            snapshot
                .humidity_pct
                .is_some_and(|h| h < self.thresholds.dry_humidity_pct),
        );
        severity
    }
}
