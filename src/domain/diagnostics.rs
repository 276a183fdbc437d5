//! Diagnostics - Device Logs, Telemetry, and Firmware Releases

use crate::domain::ids::DeviceId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ts: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLog {
    pub device_id: DeviceId,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Idle,
    Load,
    Grind,
    Dry,
    Cooldown,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEntry {
    pub ts: DateTime<Utc>,
    pub temp_c: f64,
    pub motor_load_pct: f64,
    pub cycle_phase: CyclePhase,
    pub door_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTelemetry {
    pub device_id: DeviceId,
    pub entries: Vec<TelemetryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rollout {
    Staged,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Available,
    Deprecated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareRelease {
    pub version: String,
    pub released_at: NaiveDate,
    pub rollout: Rollout,
    pub notes: String,
    pub status: ReleaseStatus,
}

impl FirmwareRelease {
    /// Parsed version, tolerating a leading `v`
    pub fn semver(&self) -> Option<semver::Version> {
        parse_firmware_version(&self.version)
    }
}

pub fn parse_firmware_version(raw: &str) -> Option<semver::Version> {
    semver::Version::parse(raw.trim().trim_start_matches('v')).ok()
}

/// Everything the device detail page shows. Each part may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub status: Option<crate::domain::status::DeviceStatus>,
    pub logs: Option<DeviceLog>,
    pub telemetry: Option<DeviceTelemetry>,
}
