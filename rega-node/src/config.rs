use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub node: NodeConfig,
    pub cloud: CloudConfig,
    pub link: LinkConfig,
    pub sensors: SensorsConfig,
    pub panel: PanelConfig,
    pub decision: DecisionConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Device serial as a hex string. When absent the serial is derived
    /// from the machine id, or randomized as a last resort.
    pub serial: Option<String>,
    /// Interval in seconds between sensor sampling passes.
    pub sampling_interval_secs: u64,
    /// Interval in milliseconds between sync engine cycles.
    pub sync_interval_ms: u64,
    /// Overall timeout in seconds for one link connect attempt.
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Base URL of the decision service, without a trailing slash.
    pub base_url: String,
    pub register_path: String,
    pub telemetry_path: String,
    pub decision_path: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkConfig {
    /// Probe a TCP target to determine reachability.
    Probe {
        /// host:port probed to decide whether the link is up.
        target: String,
        /// Timeout in milliseconds for a single probe.
        probe_timeout_ms: u64,
        /// Pause in milliseconds between probes while connecting.
        retry_interval_ms: u64,
    },
    /// Always-up link for wired deployments and tests.
    Static,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SensorsConfig {
    /// Simulated sensor suite.
    Sim {
        /// Percent chance per sample that a sensor reads unavailable.
        dropout_percent: u32,
        /// Percent chance per sample that a nutrient toggle flips.
        toggle_percent: u32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PanelConfig {
    /// Render frames to stdout.
    Console,
    /// Render frames through tracing only.
    Log,
}

/// Thresholds for the local irrigation rule.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Light level above which the "bright light" condition holds.
    pub bright_light_raw: f64,
    /// Humidity below which the "dry air" condition holds.
    pub dry_humidity_pct: f64,
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl NodeConfig {
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_secs(self.sampling_interval_secs)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            serial: None,
            sampling_interval_secs: 5,
            sync_interval_ms: 500,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            register_path: "/init/".to_string(),
            telemetry_path: "/leitura/".to_string(),
            decision_path: "/irrigacao/".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig::Probe {
            target: "127.0.0.1:8000".to_string(),
            probe_timeout_ms: 250,
            retry_interval_ms: 500,
        }
    }
}

impl Default for SensorsConfig {
    fn default() -> Self {
        SensorsConfig::Sim {
            dropout_percent: 5,
            toggle_percent: 5,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig::Console
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            bright_light_raw: 700.0,
            dry_humidity_pct: 60.0,
        }
    }
}
