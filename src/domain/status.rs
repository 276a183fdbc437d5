//! Fleet Status - Device Health, Alerts, and Business Metrics

use crate::domain::ids::{AlertId, CompanyId, DeviceId, LocationId};
use crate::domain::range::DateRangeKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceHealth {
    Online,
    Offline,
    Maintenance,
}

impl DeviceHealth {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceHealth::Online => "online",
            DeviceHealth::Offline => "offline",
            DeviceHealth::Maintenance => "maintenance",
        }
    }
}

/// Latest status reported by a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub device_id: DeviceId,
    pub status: DeviceHealth,
    pub last_seen: DateTime<Utc>,
    pub firmware_version: String,
    #[serde(rename = "cycles7d")]
    pub cycles_7d: u32,
    pub needs_maintenance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warn,
    Critical,
}

impl AlertSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warn => "warn",
            AlertSeverity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    Open,
    Ack,
    Resolved,
}

impl AlertState {
    pub fn label(&self) -> &'static str {
        match self {
            AlertState::Open => "open",
            AlertState::Ack => "ack",
            AlertState::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    pub company_id: CompanyId,
    pub location_id: LocationId,
    pub device_id: DeviceId,
    pub severity: AlertSeverity,
    pub state: AlertState,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Business KPIs for one company over one preset range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub company_id: CompanyId,
    pub date_range_key: DateRangeKey,
    pub co2_avoided_kg: f64,
    pub waste_diverted_kg: f64,
    pub cycles_completed: u32,
    pub maintenance_required_count: u32,
}
