//! Device table construction from configuration.

use a1_axis::AxisError;
use a1_common::protocol::PROTOCOL_REVISION;
use a1_server::device::{AttrValue, DeviceError, DeviceKind, DeviceState};
use a1_server::{DeviceServer, DriverRegistry};

use super::{start, try_start};

const TWO_AXES: &str = r#"
[[axes]]
device = "a1/axis/x"
axis_name = "X"

[[axes]]
device = "a1/axis/y"
axis_name = "Y"
motion_velocity = 2.0

[[encoders]]
device = "a1/encoder/x"
axis_name = "X"
scale = 2.0
offset = 1.0

[driver_config.simulation]
api_version = "2.11.0"

[[driver_config.simulation.axes]]
name = "X"
encoder_offset = 2.0

[[driver_config.simulation.axes]]
name = "Y"
"#;

#[test]
fn builds_devices_in_table_order() {
    let server = start(TWO_AXES);
    let devices: Vec<_> = server.devices().map(|d| (d.name().to_string(), d.kind())).collect();
    assert_eq!(
        devices,
        [
            ("a1/controller/1".to_string(), DeviceKind::Controller),
            ("a1/axis/x".to_string(), DeviceKind::Axis),
            ("a1/axis/y".to_string(), DeviceKind::Axis),
            ("a1/encoder/x".to_string(), DeviceKind::Encoder),
        ]
    );
    assert!(server.skipped().is_empty());
}

#[test]
fn controller_attributes() {
    let server = start(TWO_AXES);
    let controller = server.device("a1/controller/1").unwrap();
    assert_eq!(controller.state().unwrap(), DeviceState::Standby);
    assert_eq!(
        controller.read_attribute("api_version").unwrap(),
        AttrValue::Text("2.11.0".to_string())
    );
    assert_eq!(
        controller.read_attribute("available_axis_count").unwrap(),
        AttrValue::Int(2)
    );
    assert_eq!(
        controller.read_attribute("available_task_count").unwrap(),
        AttrValue::Int(0)
    );
    assert_eq!(
        controller.read_attribute("is_running").unwrap(),
        AttrValue::Bool(true)
    );
    assert!(matches!(
        controller.write_attribute("is_running", AttrValue::Bool(false)),
        Err(DeviceError::ReadOnly { .. })
    ));
}

#[test]
fn controller_reports_protocol_revision() {
    let server = start(TWO_AXES);
    let controller = server.device("a1/controller/1").unwrap();
    assert_eq!(
        controller.read_attribute("protocol_revision").unwrap(),
        AttrValue::Int(PROTOCOL_REVISION)
    );
    assert!(controller.attributes().iter().any(|a| a.name == "protocol_revision"));
    assert!(controller.status().unwrap().contains(&format!("protocol rev {PROTOCOL_REVISION}")));
    assert!(matches!(
        controller.write_attribute("protocol_revision", AttrValue::Int(2)),
        Err(DeviceError::ReadOnly { .. })
    ));
}

#[test]
fn configured_motion_velocity_is_initial_value() {
    let server = start(TWO_AXES);
    let x = server.device("a1/axis/x").unwrap();
    let y = server.device("a1/axis/y").unwrap();
    assert_eq!(x.read_attribute("motion_velocity").unwrap(), AttrValue::Float(5.0));
    assert_eq!(y.read_attribute("motion_velocity").unwrap(), AttrValue::Float(2.0));
}

#[test]
fn encoder_position_is_scaled_and_offset() {
    let server = start(TWO_AXES);
    let encoder = server.device("a1/encoder/x").unwrap();
    assert_eq!(encoder.state().unwrap(), DeviceState::Standby);
    // (0.0 + 2.0) * 2.0 - 1.0
    assert_eq!(encoder.read_attribute("position").unwrap(), AttrValue::Float(3.0));
    assert!(matches!(
        encoder.write_attribute("position", AttrValue::Float(0.0)),
        Err(DeviceError::ReadOnly { .. })
    ));
}

#[test]
fn unusable_axes_are_skipped() {
    let server = start(
        r#"
[[axes]]
device = "a1/axis/x"
axis_name = "X"

[[axes]]
device = "a1/axis/unnamed"

[[axes]]
device = "a1/axis/ghost"
axis_name = "Q"

[[driver_config.simulation.axes]]
name = "X"
"#,
    );
    assert!(server.device("a1/axis/x").is_ok());
    assert!(matches!(
        server.device("a1/axis/ghost"),
        Err(DeviceError::UnknownDevice(_))
    ));

    let skipped = server.skipped();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].0, "a1/axis/unnamed");
    assert!(matches!(
        skipped[0].1,
        DeviceError::Axis(AxisError::ConfigurationMissing("axis_name"))
    ));
    assert_eq!(skipped[1].0, "a1/axis/ghost");
    match &skipped[1].1 {
        DeviceError::Axis(AxisError::DriverRejected { message, .. }) => {
            assert!(message.contains("'Q'"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn unknown_driver_aborts_startup() {
    let mut config = super::load(TWO_AXES);
    config.controller.driver = "ethercat".to_string();
    let result = DeviceServer::start(&config, &DriverRegistry::with_builtin());
    assert!(matches!(result, Err(DeviceError::DriverNotFound(name)) if name == "ethercat"));
}

#[test]
fn invalid_driver_section_aborts_startup() {
    let result = try_start(
        r#"
[driver_config.simulation]
api_version = "two"
"#,
    );
    assert!(matches!(result, Err(DeviceError::Config(_))));
}

#[test]
fn connection_failure_aborts_startup() {
    let mut config = super::load("");
    config.controller.ip_address = String::new();
    let result = DeviceServer::start(&config, &DriverRegistry::with_builtin());
    assert!(matches!(
        result,
        Err(DeviceError::Axis(AxisError::ConnectionFailed { .. }))
    ));
}

#[test]
fn shipped_config_starts() {
    let config: a1_common::config::ServerConfig =
        toml::from_str(include_str!("../../../config/server.toml")).unwrap();
    let server = DeviceServer::start(&config, &DriverRegistry::with_builtin())
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(server.devices().count(), 5);
    assert!(server.skipped().is_empty());

    let y2 = server.device("a1/axis/y2").unwrap();
    assert_eq!(y2.state().unwrap(), DeviceState::Disabled);
}
