use rand::Rng;
use rega_core::SensorSnapshot;
use tracing::debug;

/// The node's sensor layer: one wholesale snapshot per sampling cycle.
///
/// Sampling is cheap, idempotent and safe to call every cycle; failures
/// surface as `None` fields in the snapshot, never as errors.
pub trait SensorSuite: Send {
    fn sample(&mut self) -> SensorSnapshot;
}

/// Simulated sensor suite.
///
/// Values follow a small random walk around plausible field conditions,
/// individual sensors occasionally drop out, and the nutrient toggles
/// flip the way a technician would press the physical buttons.
pub struct SimSensorSuite {
    dropout_percent: u32,
    toggle_percent: u32,
    temperature_c: f64,
    humidity_pct: f64,
    light_raw: f64,
    soil_moisture_pct: f64,
    phosphorus_present: bool,
    potassium_present: bool,
}

impl SimSensorSuite {
    pub fn new(dropout_percent: u32, toggle_percent: u32) -> Self {
        Self {
            dropout_percent: dropout_percent.min(100),
            toggle_percent: toggle_percent.min(100),
            temperature_c: 24.0,
            humidity_pct: 55.0,
            light_raw: 600.0,
            soil_moisture_pct: 45.0,
            phosphorus_present: true,
            potassium_present: true,
        }
    }

    fn walk(value: &mut f64, step: f64, min: f64, max: f64) {
        let delta: f64 = rand::rng().random_range(-step..step);
        *value = (*value + delta).clamp(min, max);
    }

    fn available(&self, value: f64) -> Option<f64> {
        if rand::rng().random_ratio(self.dropout_percent, 100) {
            None
        } else {
            Some(value)
        }
    }

    fn maybe_flip(&self, current: bool) -> bool {
        if rand::rng().random_ratio(self.toggle_percent, 100) {
            !current
        } else {
            current
        }
    }
}

impl SensorSuite for SimSensorSuite {
    fn sample(&mut self) -> SensorSnapshot {
        Self::walk(&mut self.temperature_c, 0.5, -5.0, 45.0);
        Self::walk(&mut self.humidity_pct, 2.0, 0.0, 100.0);
        Self::walk(&mut self.light_raw, 50.0, 0.0, 4095.0);
        Self::walk(&mut self.soil_moisture_pct, 1.5, 0.0, 100.0);

        self.phosphorus_present = self.maybe_flip(self.phosphorus_present);
        self.potassium_present = self.maybe_flip(self.potassium_present);

        let snapshot = SensorSnapshot {
            temperature_c: self.available(self.temperature_c),
            humidity_pct: self.available(self.humidity_pct),
            light_raw: self.available(self.light_raw),
            // Clamped at the source; downstream code relies on [0, 100].
            soil_moisture_pct: self.soil_moisture_pct.clamp(0.0, 100.0),
            phosphorus_present: self.phosphorus_present,
            potassium_present: self.potassium_present,
            sampled_at: jiff::Timestamp::now(),
        };
        debug!(?snapshot, "Sampled sensors");
        snapshot
    }
}
