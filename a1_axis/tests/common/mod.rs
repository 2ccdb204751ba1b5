//! Recording controller driver shared by the integration tests.
//!
//! Every driver call is appended to a log together with the calling thread,
//! so tests can assert both which calls were issued and how calls from
//! different threads were ordered.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use a1_axis::{ControllerHandle, SharedController};
use a1_common::config::{AxisDeviceConfig, EncoderDeviceConfig};
use a1_common::driver::{
    ApiVersion, AxisIndex, ControllerDriver, DriverResult, Rejected, StatusConfigId,
};
use a1_common::protocol::{
    AxisFaultBits, AxisParameter, AxisStatusBits, DriveItem, DriveStatusBits, STATUS_ITEM_COUNT,
    StatusItem,
};
use parking_lot::Mutex;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect(String),
    Disconnect,
    AxisIndex(String),
    AvailableAxisCount,
    IsRunning,
    CreateStatusConfig(AxisIndex),
    DestroyStatusConfig(AxisIndex),
    StatusResults(AxisIndex),
    AxisParameter(AxisIndex, AxisParameter),
    SetAxisParameter(AxisIndex, AxisParameter, f64),
    DriveItem(AxisIndex),
    Enable(Vec<AxisIndex>),
    Disable(Vec<AxisIndex>),
    HomeAsync(Vec<AxisIndex>),
    FreerunStop(Vec<AxisIndex>),
    Freerun(Vec<AxisIndex>, Vec<f64>),
    MoveAbsolute(Vec<AxisIndex>, Vec<f64>, Vec<f64>),
    FaultAcknowledge(Vec<AxisIndex>),
    AcknowledgeAll,
}

impl Call {
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Self::Enable(_)
                | Self::Disable(_)
                | Self::HomeAsync(_)
                | Self::FreerunStop(_)
                | Self::Freerun(..)
                | Self::MoveAbsolute(..)
                | Self::FaultAcknowledge(_)
                | Self::AcknowledgeAll
        )
    }
}

#[derive(Debug, Default)]
pub struct MockAxis {
    pub name: String,
    /// Results in status item order.
    pub results: [f64; STATUS_ITEM_COUNT],
    pub params: HashMap<AxisParameter, f64>,
    pub biss_counts: f64,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub connected: bool,
    pub connect_refused: bool,
    pub axes: Vec<MockAxis>,
    pub configs: HashMap<u32, AxisIndex>,
    pub next_config: u32,
    pub log: Vec<(ThreadId, Call)>,
    pub rejected_calls: HashSet<&'static str>,
    pub rejected_acks: HashSet<AxisIndex>,
    pub error_message: String,
}

/// Test-side view of the driver state.
#[derive(Debug, Clone, Default)]
pub struct Mock(Arc<Mutex<MockState>>);

impl Mock {
    /// A mock controller exposing `names` as axes 0..n, all enabled and idle.
    pub fn with_axes(names: &[&str]) -> Self {
        let mock = Self::default();
        {
            let mut state = mock.0.lock();
            for name in names {
                let mut params = HashMap::new();
                params.insert(AxisParameter::CountsPerUnit, 1000.0);
                state.axes.push(MockAxis {
                    name: (*name).to_string(),
                    params,
                    ..Default::default()
                });
            }
        }
        for axis in 0..names.len() {
            mock.set_standby(axis as AxisIndex);
        }
        mock
    }

    pub fn driver(&self) -> Box<dyn ControllerDriver> {
        Box::new(RecordingDriver(self.clone()))
    }

    /// Shared handle around a driver that is already connected.
    pub fn connected_handle(&self) -> ControllerHandle {
        self.0.lock().connected = true;
        SharedController::new(self.driver())
    }

    pub fn set_words(&self, axis: AxisIndex, status: u32, drive: u32, fault: u32) {
        let mut state = self.0.lock();
        let results = &mut state.axes[axis as usize].results;
        results[StatusItem::AxisStatus.slot()] = f64::from(status);
        results[StatusItem::DriveStatus.slot()] = f64::from(drive);
        results[StatusItem::AxisFault.slot()] = f64::from(fault);
    }

    pub fn set_standby(&self, axis: AxisIndex) {
        self.set_words(
            axis,
            AxisStatusBits::MOTION_DONE.bits(),
            DriveStatusBits::ENABLED.bits(),
            0,
        );
    }

    pub fn set_disabled(&self, axis: AxisIndex) {
        self.set_words(axis, AxisStatusBits::MOTION_DONE.bits(), 0, 0);
    }

    pub fn set_fault(&self, axis: AxisIndex, fault: AxisFaultBits) {
        self.set_words(
            axis,
            AxisStatusBits::MOTION_DONE.bits(),
            DriveStatusBits::ENABLED.bits(),
            fault.bits(),
        );
    }

    pub fn set_result(&self, axis: AxisIndex, item: StatusItem, value: f64) {
        self.0.lock().axes[axis as usize].results[item.slot()] = value;
    }

    pub fn set_param(&self, axis: AxisIndex, parameter: AxisParameter, value: f64) {
        self.0.lock().axes[axis as usize].params.insert(parameter, value);
    }

    pub fn param(&self, axis: AxisIndex, parameter: AxisParameter) -> Option<f64> {
        self.0.lock().axes[axis as usize].params.get(&parameter).copied()
    }

    pub fn set_biss_counts(&self, axis: AxisIndex, counts: f64) {
        self.0.lock().axes[axis as usize].biss_counts = counts;
    }

    pub fn set_connected(&self, connected: bool) {
        self.0.lock().connected = connected;
    }

    pub fn refuse_connect(&self, message: &str) {
        let mut state = self.0.lock();
        state.connect_refused = true;
        state.error_message = message.to_string();
    }

    /// Make every call of the named driver method fail with `message`.
    pub fn reject(&self, method: &'static str, message: &str) {
        let mut state = self.0.lock();
        state.rejected_calls.insert(method);
        state.error_message = message.to_string();
    }

    /// Make fault-acknowledge of one axis fail.
    pub fn reject_ack(&self, axis: AxisIndex) {
        self.0.lock().rejected_acks.insert(axis);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().log.iter().map(|(_, call)| call.clone()).collect()
    }

    pub fn log(&self) -> Vec<(ThreadId, Call)> {
        self.0.lock().log.clone()
    }

    pub fn commands(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_command).collect()
    }

    pub fn clear_log(&self) {
        self.0.lock().log.clear();
    }

    pub fn live_configs(&self) -> usize {
        self.0.lock().configs.len()
    }
}

pub fn axis_config(device: &str, name: &str) -> AxisDeviceConfig {
    AxisDeviceConfig {
        device: device.to_string(),
        axis_name: Some(name.to_string()),
        motion_velocity: 5.0,
    }
}

pub fn encoder_config(device: &str, name: &str, scale: f64, offset: f64) -> EncoderDeviceConfig {
    EncoderDeviceConfig {
        device: device.to_string(),
        axis_name: Some(name.to_string()),
        scale,
        offset,
    }
}

// ─── Driver ─────────────────────────────────────────────────────────

pub struct RecordingDriver(Mock);

impl RecordingDriver {
    /// Record `call` and fail if `method` is configured to reject.
    fn record(&self, method: &'static str, call: Call) -> DriverResult<()> {
        let mut state = self.0.0.lock();
        state.log.push((thread::current().id(), call));
        if state.rejected_calls.contains(method) {
            return Err(Rejected);
        }
        Ok(())
    }
}

impl ControllerDriver for RecordingDriver {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn connect(&mut self, host: &str) -> DriverResult<()> {
        self.record("connect", Call::Connect(host.to_string()))?;
        let mut state = self.0.0.lock();
        if state.connect_refused {
            return Err(Rejected);
        }
        state.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        let _ = self.record("disconnect", Call::Disconnect);
        self.0.0.lock().connected = false;
    }

    fn is_connected(&self) -> bool {
        self.0.0.lock().connected
    }

    fn api_version(&self) -> ApiVersion {
        ApiVersion {
            major: 2,
            minor: 11,
            patch: 0,
        }
    }

    fn is_running(&mut self) -> DriverResult<bool> {
        self.record("is_running", Call::IsRunning)?;
        Ok(true)
    }

    fn available_axis_count(&mut self) -> DriverResult<u32> {
        self.record("available_axis_count", Call::AvailableAxisCount)?;
        Ok(self.0.0.lock().axes.len() as u32)
    }

    fn axis_index(&mut self, name: &str) -> DriverResult<AxisIndex> {
        self.record("axis_index", Call::AxisIndex(name.to_string()))?;
        let state = self.0.0.lock();
        state
            .axes
            .iter()
            .position(|axis| axis.name == name)
            .map(|i| i as AxisIndex)
            .ok_or(Rejected)
    }

    fn create_status_config(
        &mut self,
        axis: AxisIndex,
        items: &[StatusItem],
    ) -> DriverResult<StatusConfigId> {
        assert_eq!(items.len(), STATUS_ITEM_COUNT);
        self.record("create_status_config", Call::CreateStatusConfig(axis))?;
        let mut state = self.0.0.lock();
        let id = state.next_config;
        state.next_config += 1;
        state.configs.insert(id, axis);
        Ok(StatusConfigId(id))
    }

    fn destroy_status_config(&mut self, config: StatusConfigId) {
        let axis = self.0.0.lock().configs.remove(&config.0);
        if let Some(axis) = axis {
            let _ = self.record("destroy_status_config", Call::DestroyStatusConfig(axis));
        }
    }

    fn status_results(&mut self, config: StatusConfigId, out: &mut [f64]) -> DriverResult<()> {
        let axis = self.0.0.lock().configs.get(&config.0).copied().ok_or(Rejected)?;
        self.record("status_results", Call::StatusResults(axis))?;
        // widen the window for interleaving in concurrency tests
        thread::yield_now();
        let state = self.0.0.lock();
        out.copy_from_slice(&state.axes[axis as usize].results);
        Ok(())
    }

    fn axis_parameter(&mut self, axis: AxisIndex, parameter: AxisParameter) -> DriverResult<f64> {
        self.record("axis_parameter", Call::AxisParameter(axis, parameter))?;
        let state = self.0.0.lock();
        Ok(state.axes[axis as usize]
            .params
            .get(&parameter)
            .copied()
            .unwrap_or(0.0))
    }

    fn set_axis_parameter(
        &mut self,
        axis: AxisIndex,
        parameter: AxisParameter,
        value: f64,
    ) -> DriverResult<()> {
        self.record(
            "set_axis_parameter",
            Call::SetAxisParameter(axis, parameter, value),
        )?;
        self.0.0.lock().axes[axis as usize].params.insert(parameter, value);
        Ok(())
    }

    fn drive_item(&mut self, axis: AxisIndex, item: DriveItem) -> DriverResult<f64> {
        assert_eq!(item, DriveItem::PrimaryBissAbsolutePosition);
        self.record("drive_item", Call::DriveItem(axis))?;
        Ok(self.0.0.lock().axes[axis as usize].biss_counts)
    }

    fn enable(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.record("enable", Call::Enable(axes.to_vec()))
    }

    fn disable(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.record("disable", Call::Disable(axes.to_vec()))
    }

    fn home_async(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.record("home_async", Call::HomeAsync(axes.to_vec()))
    }

    fn freerun_stop(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.record("freerun_stop", Call::FreerunStop(axes.to_vec()))
    }

    fn freerun(&mut self, axes: &[AxisIndex], velocities: &[f64]) -> DriverResult<()> {
        self.record("freerun", Call::Freerun(axes.to_vec(), velocities.to_vec()))
    }

    fn move_absolute(
        &mut self,
        axes: &[AxisIndex],
        positions: &[f64],
        velocities: &[f64],
    ) -> DriverResult<()> {
        self.record(
            "move_absolute",
            Call::MoveAbsolute(axes.to_vec(), positions.to_vec(), velocities.to_vec()),
        )
    }

    fn fault_acknowledge(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.record("fault_acknowledge", Call::FaultAcknowledge(axes.to_vec()))?;
        let state = self.0.0.lock();
        if axes.iter().any(|axis| state.rejected_acks.contains(axis)) {
            return Err(Rejected);
        }
        Ok(())
    }

    fn acknowledge_all(&mut self) -> DriverResult<()> {
        self.record("acknowledge_all", Call::AcknowledgeAll)
    }

    fn last_error_message(&self) -> String {
        self.0.0.lock().error_message.clone()
    }
}
