use std::path::Path;

use rand::Rng;
use rega_core::DeviceSerial;
use tracing::{info, warn};

const MACHINE_ID_PATH: &str = "/etc/machine-id";

/// Build the device serial once at startup.
///
/// Resolution order: configured hex string, then the host machine id,
/// then a random serial (logged as a warning, since a random serial
/// changes every boot and the service will see a new device).
pub fn acquire(configured: Option<&str>) -> color_eyre::Result<DeviceSerial> {
    if let Some(s) = configured {
        let serial: DeviceSerial = s.parse()?;
        info!(%serial, "Using configured device serial");
        return Ok(serial);
    }

    if let Some(serial) = from_machine_id(Path::new(MACHINE_ID_PATH)) {
        info!(%serial, "Derived device serial from machine id");
        return Ok(serial);
    }

    let serial = DeviceSerial(rand::rng().random());
    warn!(%serial, "No stable identity source, using a random serial");
    Ok(serial)
}

/// Derive a serial from the first 16 hex digits of a machine-id file.
fn from_machine_id(path: &Path) -> Option<DeviceSerial> {
    let content = std::fs::read_to_string(path).ok()?;
    let hex: String = content.chars().filter(|c| c.is_ascii_hexdigit()).take(16).collect();
    if hex.len() < 16 {
        return None;
    }
    hex.parse().ok()
}
