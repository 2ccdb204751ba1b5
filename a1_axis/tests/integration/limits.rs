//! Integration test: hard and soft limit resolution through the axis.

use a1_axis::Axis;
use a1_axis::limits::LimitSide;
use a1_common::protocol::{AxisParameter, DriveStatusBits};

use crate::common::{Call, Mock, axis_config};

fn single_axis() -> (Mock, Axis) {
    let mock = Mock::with_axes(&["X"]);
    let axis = Axis::new(mock.connected_handle(), &axis_config("a1/axis/x", "X")).unwrap();
    mock.clear_log();
    (mock, axis)
}

#[test]
fn ccw_input_is_positive_limit_in_normal_direction() {
    let (mock, axis) = single_axis();
    let drive = DriveStatusBits::ENABLED | DriveStatusBits::CCW_END_OF_TRAVEL_LIMIT_INPUT;
    mock.set_words(0, 0, drive.bits(), 0);

    assert!(axis.hard_limit(LimitSide::Positive).unwrap());
    assert!(!axis.hard_limit(LimitSide::Negative).unwrap());
}

#[test]
fn reversed_direction_inverts_hard_limits() {
    let (mock, axis) = single_axis();
    let drive = DriveStatusBits::ENABLED | DriveStatusBits::CCW_END_OF_TRAVEL_LIMIT_INPUT;
    mock.set_words(0, 0, drive.bits(), 0);
    mock.set_param(0, AxisParameter::ReverseMotionDirection, 1.0);

    let limits = axis.hard_limits().unwrap();
    assert!(!limits.positive);
    assert!(limits.negative);
}

#[test]
fn hard_limits_sample_then_read_direction_in_one_section() {
    let (mock, axis) = single_axis();
    axis.hard_limits().unwrap();
    assert_eq!(
        mock.calls(),
        vec![
            Call::StatusResults(0),
            Call::AxisParameter(0, AxisParameter::ReverseMotionDirection),
        ]
    );
}

#[test]
fn soft_limits_are_nan_when_disabled() {
    let (mock, axis) = single_axis();
    mock.set_param(0, AxisParameter::SoftwareLimitHigh, 10.0);
    mock.set_param(0, AxisParameter::SoftwareLimitLow, -10.0);

    for setup in [0.0, 0.7, -0.2] {
        mock.set_param(0, AxisParameter::SoftwareLimitSetup, setup);
        assert!(axis.soft_limit(LimitSide::Positive).unwrap().is_nan());
        assert!(axis.soft_limit(LimitSide::Negative).unwrap().is_nan());
    }
}

#[test]
fn soft_limits_are_verbatim_when_enabled() {
    let (mock, axis) = single_axis();
    mock.set_param(0, AxisParameter::SoftwareLimitSetup, 3.0);

    for (high, low) in [(10.0, -10.0), (0.0, 0.0), (-1.5, -7.25)] {
        mock.set_param(0, AxisParameter::SoftwareLimitHigh, high);
        mock.set_param(0, AxisParameter::SoftwareLimitLow, low);
        assert_eq!(axis.soft_limit(LimitSide::Positive).unwrap(), high);
        assert_eq!(axis.soft_limit(LimitSide::Negative).unwrap(), low);
    }
}

#[test]
fn soft_limit_write_is_forwarded_unconditionally() {
    let (mock, axis) = single_axis();
    mock.set_disabled(0);

    axis.set_soft_limit(LimitSide::Negative, -42.0).unwrap();
    axis.set_soft_limit(LimitSide::Positive, f64::MAX).unwrap();
    assert_eq!(
        mock.calls(),
        vec![
            Call::SetAxisParameter(0, AxisParameter::SoftwareLimitLow, -42.0),
            Call::SetAxisParameter(0, AxisParameter::SoftwareLimitHigh, f64::MAX),
        ]
    );
    assert_eq!(mock.param(0, AxisParameter::SoftwareLimitLow), Some(-42.0));
}
