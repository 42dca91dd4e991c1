use rega_core::SensorSnapshot;
use tracing::info;

use crate::decision::IrrigationDecision;

/// A composed two-line frame, the 16x2 character panel analogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFrame {
    pub line0: String,
    pub line1: String,
}

impl PanelFrame {
    /// Startup banner shown before the control loop begins.
    pub fn banner() -> Self {
        Self {
            line0: "rega field node".to_string(),
            line1: "starting...".to_string(),
        }
    }

    /// Readings line plus state line, `--` standing in for an
    /// unavailable sensor.
    pub fn compose(snapshot: &SensorSnapshot, decision: &IrrigationDecision) -> Self {
        let line0 = format!(
            "T:{} L:{}",
            fmt_reading(snapshot.temperature_c, 1),
            fmt_reading(snapshot.light_raw, 0),
        );
        let line1 = format!(
            "U:{} S:{:.0} {} {} I:{}",
            fmt_reading(snapshot.humidity_pct, 0),
            snapshot.soil_moisture_pct,
            toggle('F', snapshot.phosphorus_present),
            toggle('K', snapshot.potassium_present),
            if decision.irrigate { "ON" } else { "--" },
        );
        Self { line0, line1 }
    }
}

fn fmt_reading(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "--".to_string(),
    }
}

fn toggle(label: char, present: bool) -> String {
    format!("{label}:{}", if present { 'Y' } else { 'N' })
}

/// Output sink for composed frames.
///
/// The control loop always talks to this trait; choosing between a real
/// display and log-only output is a configuration concern, never a
/// nullability branch in the loop. Rendering never fails a cycle.
pub trait Panel: Send + Sync {
    fn render(&self, frame: &PanelFrame);
}

/// Renders frames to stdout, standing in for the physical display.
pub struct ConsolePanel;

impl Panel for ConsolePanel {
    fn render(&self, frame: &PanelFrame) {
        println!("{}", frame.line0);
        println!("{}", frame.line1);
    }
}

/// Renders frames through tracing only.
pub struct LogPanel;

impl Panel for LogPanel {
    fn render(&self, frame: &PanelFrame) {
        info!(line0 = %frame.line0, line1 = %frame.line1, "Panel frame");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecisionConfig;
    use crate::decision::DecisionEngine;

    #[test]
    fn frame_shows_all_five_values() {
        let snapshot = SensorSnapshot {
            temperature_c: Some(23.4),
            humidity_pct: Some(55.0),
            light_raw: Some(812.0),
            soil_moisture_pct: 42.0,
            phosphorus_present: true,
            potassium_present: false,
            sampled_at: jiff::Timestamp::UNIX_EPOCH,
        };
        let decision =
            DecisionEngine::new(DecisionConfig::default()).evaluate(&snapshot, Some(true));

        let frame = PanelFrame::compose(&snapshot, &decision);
        assert_eq!(frame.line0, "T:23.4 L:812");
        assert_eq!(frame.line1, "U:55 S:42 F:Y K:N I:ON");
    }

    #[test]
    fn unavailable_sensors_render_as_dashes() {
        let snapshot = SensorSnapshot {
            temperature_c: None,
            humidity_pct: None,
            light_raw: None,
            soil_moisture_pct: 0.0,
            phosphorus_present: false,
            potassium_present: false,
            sampled_at: jiff::Timestamp::UNIX_EPOCH,
        };
        let decision = DecisionEngine::new(DecisionConfig::default()).evaluate(&snapshot, None);

        let frame = PanelFrame::compose(&snapshot, &decision);
        assert_eq!(frame.line0, "T:-- L:--");
        assert_eq!(frame.line1, "U:-- S:0 F:N K:N I:ON");
    }
}
