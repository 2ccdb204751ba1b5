//! State transition monitoring.

use a1_server::StateMonitor;
use a1_server::device::DeviceState;

use super::start;

const CONFIG: &str = r#"
[[axes]]
device = "a1/axis/x"
axis_name = "X"

[[driver_config.simulation.axes]]
name = "X"
"#;

#[test]
fn first_poll_reports_every_device() {
    let server = start(CONFIG);
    let mut monitor = StateMonitor::new();

    let changes = monitor.poll(&server);
    let seen: Vec<_> = changes
        .iter()
        .map(|c| (c.device.as_str(), c.from, c.to))
        .collect();
    assert_eq!(
        seen,
        [
            ("a1/controller/1", None, DeviceState::Standby),
            ("a1/axis/x", None, DeviceState::Disabled),
        ]
    );
}

#[test]
fn only_transitions_are_reported() {
    let server = start(CONFIG);
    let mut monitor = StateMonitor::new();
    monitor.poll(&server);
    assert!(monitor.poll(&server).is_empty());

    server.device("a1/axis/x").unwrap().execute("enable", None).unwrap();
    let changes = monitor.poll(&server);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].device, "a1/axis/x");
    assert_eq!(changes[0].from, Some(DeviceState::Disabled));
    assert_eq!(changes[0].to, DeviceState::Standby);
}
