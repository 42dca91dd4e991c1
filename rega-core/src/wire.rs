//! JSON bodies exchanged with the decision service.
//!
//! The protocol is three POST endpoints: register, telemetry, decision.
//! Every body carries the device serial; unavailable sensor values
//! serialize as JSON null rather than a coerced number.

use serde::{Deserialize, Serialize};

use crate::{DeviceSerial, SensorSnapshot};

/// Body for the registration endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterBody {
    pub serial: DeviceSerial,
}

/// Body for the telemetry and decision endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryBody {
    pub serial: DeviceSerial,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub lux: Option<f64>,
    pub soil_humidity: f64,
    pub phosphorus: bool,
    pub potassium: bool,
}

impl TelemetryBody {
    /// Build a wire body from the latest snapshot.
    pub fn from_snapshot(serial: DeviceSerial, snapshot: &SensorSnapshot) -> Self {
        Self {
            serial,
            temperature: snapshot.temperature_c,
            humidity: snapshot.humidity_pct,
            lux: snapshot.light_raw,
            soil_humidity: snapshot.soil_moisture_pct,
            phosphorus: snapshot.phosphorus_present,
            potassium: snapshot.potassium_present,
        }
    }
}

/// Decision endpoint response: the authoritative irrigation boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub irrigar: bool,
}
