//! Integration test: serialization of driver calls across threads.
//!
//! A gated command samples the status and acts inside one critical section,
//! so in the driver log every command issued by a thread must directly follow
//! that same thread's status read.

use std::sync::Arc;
use std::thread;

use a1_axis::{Axis, AxisError};

use crate::common::{Call, Mock, axis_config};

const ITERATIONS: usize = 200;

fn shared_axis() -> (Mock, Arc<Axis>) {
    let mock = Mock::with_axes(&["X"]);
    let axis = Axis::new(mock.connected_handle(), &axis_config("a1/axis/x", "X")).unwrap();
    mock.clear_log();
    (mock, Arc::new(axis))
}

#[test]
fn freerun_and_position_reads_are_serialized() {
    let (mock, axis) = shared_axis();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..ITERATIONS {
                axis.freerun(i as f64).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..ITERATIONS {
                axis.position().unwrap();
            }
        });
    });

    let log = mock.log();
    assert_eq!(log.len(), 3 * ITERATIONS);

    let mut freeruns = 0;
    for (i, (thread, call)) in log.iter().enumerate() {
        if let Call::Freerun(axes, velocities) = call {
            assert_eq!(axes, &[0]);
            assert_eq!(velocities.len(), 1);
            let (prev_thread, prev_call) = &log[i - 1];
            assert_eq!(prev_call, &Call::StatusResults(0));
            assert_eq!(prev_thread, thread, "freerun acted on another thread's sample");
            freeruns += 1;
        }
    }
    assert_eq!(freeruns, ITERATIONS);
}

#[test]
fn concurrent_gated_commands_are_totally_ordered() {
    let (mock, axis) = shared_axis();
    let axis = &axis;

    let results: Vec<Result<(), AxisError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || (0..50).map(|_| axis.home()).collect::<Vec<_>>()))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });
    assert!(results.iter().all(Result::is_ok));

    let log = mock.log();
    for (i, (thread, call)) in log.iter().enumerate() {
        if call.is_command() {
            let (prev_thread, prev_call) = &log[i - 1];
            assert_eq!(prev_call, &Call::StatusResults(0));
            assert_eq!(prev_thread, thread);
        }
    }
    assert_eq!(mock.commands().len(), 200);
}
