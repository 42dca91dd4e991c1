use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rega_core::SensorSnapshot;
use rega_node::{
    identity, CloudClient, Config, ConsolePanel, DecisionEngine, FixedLink, IrrigationDecision,
    Link, LinkConfig, LogPanel, LogRelay, Panel, PanelConfig, PanelFrame, ProbeLink, Relay,
    SensorSuite, SensorsConfig, SimSensorSuite, SyncEngine,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "rega-node")]
#[command(about = "Rega field node")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "rega-node.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "rega_node=info,rega_core=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    let serial = identity::acquire(config.node.serial.as_deref())?;

    let link: Arc<dyn Link> = match &config.link {
        LinkConfig::Probe {
            target,
            probe_timeout_ms,
            retry_interval_ms,
        } => {
            info!(%target, "Using TCP-probe link");
            Arc::new(ProbeLink::new(
                target.clone(),
                Duration::from_millis(*probe_timeout_ms),
                Duration::from_millis(*retry_interval_ms),
            ))
        }
        LinkConfig::Static => {
            info!("Using static (always-up) link");
            Arc::new(FixedLink)
        }
    };

    let panel: Box<dyn Panel> = match config.panel {
        PanelConfig::Console => Box::new(ConsolePanel),
        PanelConfig::Log => Box::new(LogPanel),
    };

    let sensors = match config.sensors {
        SensorsConfig::Sim {
            dropout_percent,
            toggle_percent,
        } => {
            info!(dropout_percent, toggle_percent, "Using simulated sensors");
            SimSensorSuite::new(dropout_percent, toggle_percent)
        }
    };

    let cloud = Arc::new(CloudClient::new(&config.cloud, serial, Arc::clone(&link))?);
    let engine = SyncEngine::new(cloud, Arc::clone(&link), config.node.connect_timeout());
    let decisions = DecisionEngine::new(config.decision);
    let relay = LogRelay::new();

    info!(
        %serial,
        base_url = %config.cloud.base_url,
        sampling_interval_secs = config.node.sampling_interval_secs,
        "Starting rega-node"
    );

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down...");
            cancel_for_signal.cancel();
        }
    });

    run_control_loop(&config, sensors, engine, decisions, panel, relay, cancel).await;

    info!("rega-node shut down complete");
    Ok(())
}

/// The single-task control loop.
///
/// A coarse sampling ticker refreshes the snapshot and re-arms the sync
/// flags; a finer sync ticker runs the engine, which retries whatever
/// is still pending. Remote calls are awaited sequentially inside one
/// engine cycle, which is what preserves the registration-first,
/// abort-on-failure ordering.
async fn run_control_loop(
    config: &Config,
    mut sensors: impl SensorSuite,
    mut engine: SyncEngine,
    decisions: DecisionEngine,
    panel: Box<dyn Panel>,
    mut relay: impl Relay,
    cancel: CancellationToken,
) {
    panel.render(&PanelFrame::banner());

    let mut sample_tick = tokio::time::interval(config.node.sampling_interval());
    let mut sync_tick = tokio::time::interval(config.node.sync_interval());
    let mut snapshot: Option<SensorSnapshot> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Control loop shutting down");
                break;
            }
            _ = sample_tick.tick() => {
                let fresh = sensors.sample();
                engine.mark_sampled();

                // A fresh sample has no remote answer yet; the local
                // rule drives the relay until the decision check lands.
                let decision = decisions.evaluate(&fresh, None);
                actuate_and_render(&fresh, &decision, &mut relay, panel.as_ref());
                snapshot = Some(fresh);
            }
            _ = sync_tick.tick() => {
                let report = engine.run_cycle(snapshot.as_ref()).await;
                if let (Some(remote), Some(snap)) = (report.remote_decision, snapshot.as_ref()) {
                    let decision = decisions.evaluate(snap, Some(remote));
                    actuate_and_render(snap, &decision, &mut relay, panel.as_ref());
                }
            }
        }
    }

    // Leave the actuator in a defined state.
    relay.set_irrigation(false);
}

fn actuate_and_render(
    snapshot: &SensorSnapshot,
    decision: &IrrigationDecision,
    relay: &mut impl Relay,
    panel: &dyn Panel,
) {
    relay.set_irrigation(decision.irrigate);
    panel.render(&PanelFrame::compose(snapshot, decision));
    info!(
        temperature_c = ?snapshot.temperature_c,
        humidity_pct = ?snapshot.humidity_pct,
        light_raw = ?snapshot.light_raw,
        soil_moisture_pct = snapshot.soil_moisture_pct,
        phosphorus = snapshot.phosphorus_present,
        potassium = snapshot.potassium_present,
        severity = decision.severity,
        remote = ?decision.remote,
        irrigate = decision.irrigate,
        "Cycle state"
    );
}
