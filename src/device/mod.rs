//! Smart-plug control seam.
//!
//! Scheduling logic talks to a `DeviceControl`; the real network-backed plug
//! driver lives outside this crate. `DryRunControl` records and logs commands
//! instead of sending them, which is what the CLI uses and what tests assert on.

use chrono::Duration;
use thiserror::Error;
use tracing::info;

use crate::domain::Timestamp;
use crate::error::{AppError, EXIT_TRANSPORT};
use crate::select::WindowChoice;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    #[error("command to '{device_id}' failed: {reason}")]
    Command { device_id: String, reason: String },
}

impl From<DeviceError> for AppError {
    fn from(err: DeviceError) -> Self {
        AppError::new(EXIT_TRANSPORT, err.to_string())
    }
}

/// Minimal on/off command interface for a switchable appliance.
pub trait DeviceControl {
    /// Switch on for `duration`; the device (or its driver) switches itself off afterwards.
    fn turn_on(&mut self, device_id: &str, duration: Duration) -> Result<(), DeviceError>;

    fn turn_off(&mut self, device_id: &str) -> Result<(), DeviceError>;

    fn name(&self) -> &str;
}

/// When and for how long to run a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargePlan {
    pub device_id: String,
    pub start: Timestamp,
    pub duration_hours: usize,
}

impl ChargePlan {
    pub fn from_window(device_id: impl Into<String>, window: &WindowChoice) -> Self {
        Self {
            device_id: device_id.into(),
            start: window.start,
            duration_hours: window.window_length,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(self.duration_hours as i64)
    }

    pub fn end(&self) -> Timestamp {
        self.start + self.duration()
    }
}

/// Issue the plan's `turn_on`. Waiting until `plan.start` is the caller's job.
pub fn apply_plan<C: DeviceControl + ?Sized>(control: &mut C, plan: &ChargePlan) -> Result<(), DeviceError> {
    info!(
        device = %plan.device_id,
        controller = control.name(),
        start = %plan.start.to_rfc3339(),
        hours = plan.duration_hours,
        "applying charge plan"
    );
    control.turn_on(&plan.device_id, plan.duration())
}

/// A command captured by `DryRunControl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    On { device_id: String, duration: Duration },
    Off { device_id: String },
}

/// Logs and records commands without touching the network.
#[derive(Debug, Default)]
pub struct DryRunControl {
    known: Vec<String>,
    commands: Vec<DeviceCommand>,
}

impl DryRunControl {
    /// Accept commands for any device id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept commands only for the given aliases.
    pub fn with_devices<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: aliases.into_iter().map(Into::into).collect(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    fn check_known(&self, device_id: &str) -> Result<(), DeviceError> {
        if self.known.is_empty() || self.known.iter().any(|d| d == device_id) {
            Ok(())
        } else {
            Err(DeviceError::UnknownDevice(device_id.to_string()))
        }
    }
}

impl DeviceControl for DryRunControl {
    fn turn_on(&mut self, device_id: &str, duration: Duration) -> Result<(), DeviceError> {
        self.check_known(device_id)?;
        info!(device = device_id, minutes = duration.num_minutes(), "dry-run: turn on");
        self.commands.push(DeviceCommand::On {
            device_id: device_id.to_string(),
            duration,
        });
        Ok(())
    }

    fn turn_off(&mut self, device_id: &str) -> Result<(), DeviceError> {
        self.check_known(device_id)?;
        info!(device = device_id, "dry-run: turn off");
        self.commands.push(DeviceCommand::Off {
            device_id: device_id.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
