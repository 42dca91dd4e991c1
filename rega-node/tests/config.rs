use std::io::Write;

use rega_node::{Config, LinkConfig, PanelConfig, SensorsConfig};

fn load(toml: &str) -> Config {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    Config::load(file.path()).unwrap()
}

#[test]
fn full_config_parses() {
    let config = load(
        r#"
        [node]
        serial = "00000000000000AB"
        sampling_interval_secs = 10
        sync_interval_ms = 250
        connect_timeout_secs = 5

        [cloud]
        base_url = "http://farm.example:9000"
        register_path = "/init/"
        telemetry_path = "/leitura/"
        decision_path = "/irrigacao/"
        request_timeout_secs = 3

        [link]
        type = "probe"
        target = "farm.example:9000"
        probe_timeout_ms = 100
        retry_interval_ms = 500

        [sensors]
        type = "sim"
        dropout_percent = 10
        toggle_percent = 2

        [panel]
        type = "log"

        [decision]
        bright_light_raw = 650.0
        dry_humidity_pct = 55.0
        "#,
    );

    assert_eq!(config.node.serial.as_deref(), Some("00000000000000AB"));
    assert_eq!(config.node.sampling_interval_secs, 10);
    assert_eq!(config.cloud.base_url, "http://farm.example:9000");
    assert_eq!(config.cloud.request_timeout_secs, 3);
    assert!(matches!(
        config.link,
        LinkConfig::Probe { ref target, probe_timeout_ms: 100, retry_interval_ms: 500 }
            if target == "farm.example:9000"
    ));
    assert!(matches!(
        config.sensors,
        SensorsConfig::Sim {
            dropout_percent: 10,
            toggle_percent: 2
        }
    ));
    assert!(matches!(config.panel, PanelConfig::Log));
    assert_eq!(config.decision.bright_light_raw, 650.0);
    assert_eq!(config.decision.dry_humidity_pct, 55.0);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let config = load(
        r#"
        [cloud]
        base_url = "http://10.0.0.2:8000"
        "#,
    );

    // Overridden value sticks, the rest of the section defaults.
    assert_eq!(config.cloud.base_url, "http://10.0.0.2:8000");
    assert_eq!(config.cloud.register_path, "/init/");
    assert_eq!(config.cloud.telemetry_path, "/leitura/");
    assert_eq!(config.cloud.decision_path, "/irrigacao/");

    // Absent sections are fully defaulted.
    assert_eq!(config.node.serial, None);
    assert_eq!(config.node.sampling_interval_secs, 5);
    assert_eq!(config.node.connect_timeout_secs, 10);
    assert!(matches!(config.link, LinkConfig::Probe { .. }));
    assert!(matches!(config.panel, PanelConfig::Console));
    assert_eq!(config.decision.bright_light_raw, 700.0);
    assert_eq!(config.decision.dry_humidity_pct, 60.0);
}

#[test]
fn static_link_variant_parses() {
    let config = load(
        r#"
        [link]
        type = "static"
        "#,
    );

    assert!(matches!(config.link, LinkConfig::Static));
}

#[test]
fn load_fails_on_missing_file() {
    assert!(Config::load(std::path::Path::new("/nonexistent/rega-node.toml")).is_err());
}
