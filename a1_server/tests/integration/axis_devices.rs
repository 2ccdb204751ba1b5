//! Axis devices driven through the `Device` interface.

use a1_axis::{AttrRequest, AxisError, LifecycleState};
use a1_common::protocol::AxisFaultBits;
use a1_server::device::{AttrValue, DeviceError, DeviceState};
use std::thread;
use std::time::Duration;

use super::{start, wait_for};

fn single_axis(extra: &str) -> String {
    format!(
        r#"
[[axes]]
device = "a1/axis/x"
axis_name = "X"

[[driver_config.simulation.axes]]
name = "X"
{extra}
"#
    )
}

fn not_allowed(result: Result<(), DeviceError>) -> Option<(&'static str, LifecycleState)> {
    match result {
        Err(DeviceError::Axis(AxisError::NotAllowed { action, state })) => Some((action, state)),
        _ => None,
    }
}

#[test]
fn enable_then_disable() {
    let server = start(&single_axis(""));
    let axis = server.device("a1/axis/x").unwrap();
    assert_eq!(axis.state().unwrap(), DeviceState::Disabled);

    assert!(!axis.is_command_allowed("disable").unwrap());
    assert_eq!(
        not_allowed(axis.execute("disable", None)),
        Some(("disable", LifecycleState::Disabled))
    );

    axis.execute("enable", None).unwrap();
    assert_eq!(axis.state().unwrap(), DeviceState::Standby);
    axis.execute("disable", None).unwrap();
    assert_eq!(axis.state().unwrap(), DeviceState::Disabled);
}

#[test]
fn homing_is_reported_then_completes() {
    let server = start(&single_axis("enabled = true"));
    let axis = server.device("a1/axis/x").unwrap();

    axis.execute("home", None).unwrap();
    assert_eq!(axis.state().unwrap(), DeviceState::Moving);
    assert_eq!(axis.state().unwrap(), DeviceState::Standby);
    assert!(axis.status().unwrap().contains("homed: true"));
}

#[test]
fn freerun_and_stop() {
    let server = start(&single_axis("enabled = true"));
    let axis = server.device("a1/axis/x").unwrap();

    axis.execute("freeRun", Some(-2.0)).unwrap();
    assert_eq!(axis.state().unwrap(), DeviceState::Moving);
    assert!(!axis.is_command_allowed("home").unwrap());
    assert_eq!(
        not_allowed(axis.execute("freeRun", Some(1.0))),
        Some(("freeRun", LifecycleState::Moving))
    );

    thread::sleep(Duration::from_millis(20));
    axis.execute("stop", None).unwrap();
    assert_eq!(wait_for(axis, DeviceState::Standby), DeviceState::Standby);
    let AttrValue::Float(position) = axis.read_attribute("position").unwrap() else {
        panic!("position is not a float");
    };
    assert!(position < 0.0, "{position}");
}

#[test]
fn position_write_moves_to_target() {
    let server = start(&single_axis("enabled = true"));
    let axis = server.device("a1/axis/x").unwrap();
    assert!(axis.is_attribute_allowed("position", AttrRequest::Write).unwrap());

    axis.write_attribute("position", AttrValue::Float(0.25)).unwrap();
    assert_eq!(axis.read_attribute("position_command").unwrap(), AttrValue::Float(0.25));
    assert_eq!(wait_for(axis, DeviceState::Standby), DeviceState::Standby);
    assert_eq!(axis.read_attribute("position").unwrap(), AttrValue::Float(0.25));
    assert_eq!(axis.read_attribute("velocity").unwrap(), AttrValue::Float(0.0));
}

#[test]
fn position_write_needs_standby() {
    let server = start(&single_axis(""));
    let axis = server.device("a1/axis/x").unwrap();
    assert!(!axis.is_attribute_allowed("position", AttrRequest::Write).unwrap());
    assert_eq!(
        not_allowed(axis.write_attribute("position", AttrValue::Float(1.0))),
        Some(("write_position", LifecycleState::Disabled))
    );
    // Reads stay allowed in every state.
    assert!(axis.is_attribute_allowed("position", AttrRequest::Read).unwrap());
    assert_eq!(axis.read_attribute("position").unwrap(), AttrValue::Float(0.0));
}

#[test]
fn faulted_axis_cannot_be_enabled_until_acknowledged() {
    let fault = AxisFaultBits::OVER_CURRENT.bits();
    let server = start(&single_axis(&format!("initial_fault = {fault}")));
    let axis = server.device("a1/axis/x").unwrap();
    assert_eq!(axis.state().unwrap(), DeviceState::Fault);

    let AttrValue::Text(faults) = axis.read_attribute("faults").unwrap() else {
        panic!("faults is not text");
    };
    assert!(!faults.is_empty());

    // Enable is never gated; the controller refuses it.
    match axis.execute("enable", None) {
        Err(DeviceError::Axis(AxisError::DriverRejected { operation, message })) => {
            assert_eq!(operation, "enable");
            assert!(message.contains("fault"), "{message}");
        }
        other => panic!("unexpected result {other:?}"),
    }

    axis.execute("faultAck", None).unwrap();
    assert_eq!(axis.state().unwrap(), DeviceState::Disabled);
    assert_eq!(axis.read_attribute("faults").unwrap(), AttrValue::Text(String::new()));
    assert_eq!(
        not_allowed(axis.execute("faultAck", None)),
        Some(("faultAck", LifecycleState::Disabled))
    );
}

#[test]
fn fault_acknowledge_reaches_gantry_partner() {
    let fault = AxisFaultBits::POSITION_ERROR.bits();
    let server = start(&format!(
        r#"
[[axes]]
device = "a1/axis/x"
axis_name = "X"

[[axes]]
device = "a1/axis/y"
axis_name = "Y"

[[driver_config.simulation.axes]]
name = "X"
gantry_axis_mask = 2
initial_fault = {fault}

[[driver_config.simulation.axes]]
name = "Y"
initial_fault = {fault}
"#
    ));
    let x = server.device("a1/axis/x").unwrap();
    let y = server.device("a1/axis/y").unwrap();
    assert_eq!(y.state().unwrap(), DeviceState::Fault);

    x.execute("faultAck", None).unwrap();
    assert_eq!(x.state().unwrap(), DeviceState::Disabled);
    assert_eq!(y.state().unwrap(), DeviceState::Disabled);
}

#[test]
fn end_of_travel_raises_fault_and_hard_limit() {
    let server = start(&single_axis("enabled = true\npositive_travel = 0.02"));
    let axis = server.device("a1/axis/x").unwrap();
    assert_eq!(axis.read_attribute("positive_hardlimit").unwrap(), AttrValue::Bool(false));

    axis.execute("freeRun", Some(1.0)).unwrap();
    assert_eq!(wait_for(axis, DeviceState::Fault), DeviceState::Fault);
    assert_eq!(axis.read_attribute("positive_hardlimit").unwrap(), AttrValue::Bool(true));
    assert_eq!(axis.read_attribute("negative_hardlimit").unwrap(), AttrValue::Bool(false));
    assert_eq!(axis.read_attribute("position").unwrap(), AttrValue::Float(0.02));
}

#[test]
fn reversed_axis_maps_limits_to_the_other_input() {
    let server = start(&single_axis(
        "enabled = true\nreverse_motion_direction = 1\nnegative_travel = -0.02",
    ));
    let axis = server.device("a1/axis/x").unwrap();

    axis.execute("freeRun", Some(-1.0)).unwrap();
    assert_eq!(wait_for(axis, DeviceState::Fault), DeviceState::Fault);
    assert_eq!(axis.read_attribute("negative_hardlimit").unwrap(), AttrValue::Bool(true));
    assert_eq!(axis.read_attribute("positive_hardlimit").unwrap(), AttrValue::Bool(false));
}

#[test]
fn soft_limits_are_nan_while_disabled() {
    let server = start(&single_axis(""));
    let axis = server.device("a1/axis/x").unwrap();

    axis.write_attribute("positive_softlimit", AttrValue::Float(10.0)).unwrap();
    let AttrValue::Float(high) = axis.read_attribute("positive_softlimit").unwrap() else {
        panic!("softlimit is not a float");
    };
    assert!(high.is_nan());
}

#[test]
fn soft_limits_round_trip_when_enabled() {
    let server = start(&single_axis("software_limit_setup = 1"));
    let axis = server.device("a1/axis/x").unwrap();

    axis.write_attribute("positive_softlimit", AttrValue::Float(10.0)).unwrap();
    axis.write_attribute("negative_softlimit", AttrValue::Float(-4.0)).unwrap();
    assert_eq!(axis.read_attribute("positive_softlimit").unwrap(), AttrValue::Float(10.0));
    assert_eq!(axis.read_attribute("negative_softlimit").unwrap(), AttrValue::Float(-4.0));
}

#[test]
fn soft_limit_stops_motion() {
    let server = start(&single_axis(
        "enabled = true\nsoftware_limit_setup = 1\nsoftware_limit_high = 0.02\nsoftware_limit_low = -1.0",
    ));
    let axis = server.device("a1/axis/x").unwrap();

    axis.execute("freeRun", Some(1.0)).unwrap();
    assert_eq!(wait_for(axis, DeviceState::Fault), DeviceState::Fault);
    assert_eq!(axis.read_attribute("position").unwrap(), AttrValue::Float(0.02));
}

#[test]
fn adapter_errors() {
    let server = start(&single_axis(""));
    let axis = server.device("a1/axis/x").unwrap();

    assert!(matches!(
        axis.read_attribute("torque"),
        Err(DeviceError::UnknownAttribute { .. })
    ));
    assert!(matches!(
        axis.execute("jog", None),
        Err(DeviceError::UnknownCommand { .. })
    ));
    assert!(matches!(
        axis.write_attribute("velocity", AttrValue::Float(1.0)),
        Err(DeviceError::ReadOnly { .. })
    ));
    assert!(matches!(
        axis.write_attribute("motion_velocity", AttrValue::Bool(true)),
        Err(DeviceError::TypeMismatch { .. })
    ));
    assert!(matches!(
        axis.execute("freeRun", None),
        Err(DeviceError::TypeMismatch { .. })
    ));
    assert!(matches!(
        axis.execute("stop", Some(1.0)),
        Err(DeviceError::TypeMismatch { .. })
    ));
}
