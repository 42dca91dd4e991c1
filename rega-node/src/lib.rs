pub mod cloud;
pub mod config;
pub mod decision;
pub mod identity;
pub mod link;
pub mod panel;
pub mod relay;
pub mod sensors;
pub mod sync;

pub use cloud::{Cloud, CloudClient, CloudClientError};
pub use config::{
    CloudConfig, Config, DecisionConfig, LinkConfig, NodeConfig, PanelConfig, SensorsConfig,
};
pub use decision::{DecisionEngine, IrrigationDecision};
pub use link::fixed::FixedLink;
pub use link::probe::ProbeLink;
pub use link::Link;
pub use panel::{ConsolePanel, LogPanel, Panel, PanelFrame};
pub use relay::{LogRelay, Relay};
pub use sensors::{SensorSuite, SimSensorSuite};
pub use sync::{CycleReport, PendingAction, StepResult, SyncEngine, SyncFlags};
