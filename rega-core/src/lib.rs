pub mod wire;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use wire::{DecisionResponse, RegisterBody, TelemetryBody};

/// Hardware-derived identity of a field node.
///
/// Rendered everywhere (display, wire, logs) as a fixed-width 16-digit
/// uppercase hex string, matching the serial the provisioning service keys
/// registrations on. Built once at startup and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceSerial(pub u64);

impl fmt::Display for DeviceSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// Error parsing a device serial from its hex form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSerialError(pub String);

impl fmt::Display for ParseSerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid device serial '{}'", self.0)
    }
}

impl std::error::Error for ParseSerialError {}

impl FromStr for DeviceSerial {
    type Err = ParseSerialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 16 {
            return Err(ParseSerialError(s.to_owned()));
        }
        u64::from_str_radix(trimmed, 16)
            .map(DeviceSerial)
            .map_err(|_| ParseSerialError(s.to_owned()))
    }
}

impl Serialize for DeviceSerial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeviceSerial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Snapshot of the latest sampled environment values.
///
/// `None` is the "sensor unavailable" sentinel and is never aliased to a
/// numeric default; it flows through telemetry as JSON null so the service
/// can tell a broken sensor from one reading zero. Overwritten wholesale
/// once per sampling cycle; the node keeps no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Air temperature in degrees Celsius.
    pub temperature_c: Option<f64>,
    /// Relative humidity as a percentage.
    pub humidity_pct: Option<f64>,
    /// Raw light intensity in the LDR's device-specific unit.
    pub light_raw: Option<f64>,
    /// Soil moisture percentage, clamped to [0, 100] at the source.
    pub soil_moisture_pct: f64,
    /// Phosphorus nutrient-proxy toggle.
    pub phosphorus_present: bool,
    /// Potassium nutrient-proxy toggle.
    pub potassium_present: bool,
    /// When this snapshot was taken.
    pub sampled_at: jiff::Timestamp,
}

/// Connectivity status of the wireless link.
///
/// Owned exclusively by the link implementation; everything else only
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Why a remote call produced no usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The link was known down; no I/O was attempted.
    NotConnected,
    /// The request ran past its configured timeout.
    Timeout,
    /// Transport-level failure with no HTTP status.
    Transport,
    /// A 2xx response whose expected payload was missing or malformed.
    DecodeError,
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RemoteFailure::NotConnected => "not connected",
            RemoteFailure::Timeout => "timeout",
            RemoteFailure::Transport => "transport error",
            RemoteFailure::DecodeError => "decode error",
        };
        f.write_str(s)
    }
}

/// Tagged result of a remote call.
///
/// A non-2xx status is still `Ok` here: it is data for the sync engine to
/// interpret, not an error in the transport sense. Callers must branch on
/// the tag; there is no silent default.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome<T> {
    Ok { status: u16, payload: Option<T> },
    Failed(RemoteFailure),
}

impl<T> RemoteOutcome<T> {
    /// True when the remote service accepted the request (2xx status).
    pub fn accepted(&self) -> bool {
        matches!(self, RemoteOutcome::Ok { status, .. } if (200..300).contains(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_renders_fixed_width_hex() {
        assert_eq!(DeviceSerial(0xABC).to_string(), "0000000000000ABC");
        assert_eq!(
            DeviceSerial(u64::MAX).to_string(),
            "FFFFFFFFFFFFFFFF"
        );
    }

    #[test]
    fn serial_parses_its_own_rendering() {
        let serial = DeviceSerial(0xDEAD_BEEF_0042);
        let parsed: DeviceSerial = serial.to_string().parse().unwrap();
        assert_eq!(parsed, serial);
    }

    #[test]
    fn serial_rejects_garbage() {
        assert!("".parse::<DeviceSerial>().is_err());
        assert!("xyz".parse::<DeviceSerial>().is_err());
        assert!("0123456789ABCDEF0".parse::<DeviceSerial>().is_err());
    }

    #[test]
    fn serial_serde_round_trip() {
        let serial = DeviceSerial(0x1234_5678_9ABC_DEF0);
        let json = serde_json::to_string(&serial).unwrap();
        assert_eq!(json, "\"123456789ABCDEF0\"");
        let back: DeviceSerial = serde_json::from_str(&json).unwrap();
        assert_eq!(back, serial);
    }

    #[test]
    fn outcome_accepted_only_for_2xx() {
        let ok: RemoteOutcome<()> = RemoteOutcome::Ok {
            status: 201,
            payload: None,
        };
        assert!(ok.accepted());

        let rejected: RemoteOutcome<()> = RemoteOutcome::Ok {
            status: 404,
            payload: None,
        };
        assert!(!rejected.accepted());

        let failed: RemoteOutcome<()> = RemoteOutcome::Failed(RemoteFailure::Timeout);
        assert!(!failed.accepted());
    }
}
