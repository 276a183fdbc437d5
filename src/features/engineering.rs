//! Engineering Views
//!
//! Device list with bulk selection, device diagnostics (logs and telemetry), and
//! the firmware release list. Remote actions are offered only when the session
//! carries the matching capability.

use crate::auth::{Capability, CapabilitySet};
use crate::components::data_table::{CellValue, Column, DataTable};
use crate::domain::{
    Alert, AlertState, Device, DeviceHealth, DeviceId, DeviceStatus, Diagnostics, FirmwareRelease,
    LogEntry, LogLevel, ReleaseStatus, Rollout, TelemetryEntry, parse_firmware_version,
};
use crate::features::filters::PageFilters;
use crate::states::ReferenceStore;
use crate::utils::format_date;
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};

// ==================== Firmware ====================

/// Releases newest first; unparsable versions sink to the bottom
pub fn firmware_sorted(releases: &[FirmwareRelease]) -> Vec<FirmwareRelease> {
    let mut sorted = releases.to_vec();
    sorted.sort_by(|a, b| match (a.semver(), b.semver()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.released_at.cmp(&a.released_at),
    });
    sorted
}

/// Newest stable release still marked available; pre-releases are staged only
pub fn latest_available(releases: &[FirmwareRelease]) -> Option<semver::Version> {
    releases
        .iter()
        .filter(|r| r.status == ReleaseStatus::Available)
        .filter_map(FirmwareRelease::semver)
        .filter(|v| v.pre.is_empty())
        .max()
}

/// Whether `installed` is behind `latest`. Unknown versions never count as outdated.
pub fn is_outdated(installed: &str, latest: Option<&semver::Version>) -> bool {
    match (parse_firmware_version(installed), latest) {
        (Some(installed), Some(latest)) => installed < *latest,
        _ => false,
    }
}

/// One line of the firmware release list
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareRow {
    pub version: String,
    pub released: String,
    pub staged: bool,
    pub deprecated: bool,
    pub latest: bool,
    pub notes: String,
}

pub fn firmware_rows(releases: &[FirmwareRelease]) -> Vec<FirmwareRow> {
    let latest = latest_available(releases);
    firmware_sorted(releases)
        .into_iter()
        .map(|r| FirmwareRow {
            latest: latest.is_some() && r.semver() == latest,
            released: format_date(&r.released_at),
            staged: r.rollout == Rollout::Staged,
            deprecated: r.status == ReleaseStatus::Deprecated,
            version: r.version,
            notes: r.notes,
        })
        .collect()
}

// ==================== Device list ====================

#[derive(Debug, Clone, PartialEq)]
pub struct EngDeviceRow {
    pub id: DeviceId,
    pub name: String,
    pub location_name: String,
    pub company_name: String,
    pub status: Option<DeviceHealth>,
    pub last_seen: Option<DateTime<Utc>>,
    pub firmware_version: Option<String>,
    pub firmware_outdated: bool,
    /// Unresolved alerts raised by the device
    pub alerts_count: usize,
}

pub fn eng_device_rows(
    refs: &ReferenceStore,
    filters: &PageFilters,
    statuses: &[DeviceStatus],
    alerts: &[Alert],
    releases: &[FirmwareRelease],
) -> Vec<EngDeviceRow> {
    let by_id: AHashMap<&DeviceId, &DeviceStatus> =
        statuses.iter().map(|s| (&s.device_id, s)).collect();
    let mut alert_counts: AHashMap<&DeviceId, usize> = AHashMap::new();
    for alert in alerts.iter().filter(|a| a.state != AlertState::Resolved) {
        *alert_counts.entry(&alert.device_id).or_default() += 1;
    }
    let latest = latest_available(releases);

    refs.devices()
        .iter()
        .filter(|d| {
            refs.company_id_of_location(&d.location_id)
                .is_some_and(|c| filters.matches(c, &d.location_id))
                || (filters.company().is_none() && filters.location().is_none())
        })
        .map(|d| {
            let status = by_id.get(&d.id);
            let firmware = status.map(|s| s.firmware_version.clone());
            EngDeviceRow {
                id: d.id.clone(),
                name: d.name.clone(),
                location_name: refs.location_name(&d.location_id).to_string(),
                company_name: refs
                    .company_of_device(&d.id)
                    .map_or_else(|| "Unknown".to_string(), |c| c.name.clone()),
                status: status.map(|s| s.status),
                last_seen: status.map(|s| s.last_seen),
                firmware_outdated: firmware
                    .as_deref()
                    .is_some_and(|v| is_outdated(v, latest.as_ref())),
                firmware_version: firmware,
                alerts_count: alert_counts.get(&d.id).copied().unwrap_or(0),
            }
        })
        .collect()
}

pub fn eng_device_table() -> DataTable<EngDeviceRow> {
    let columns = vec![
        Column::new("name", "Device", |r: &EngDeviceRow| {
            CellValue::from(r.name.as_str())
        })
        .sortable(),
        Column::new("id", "Device ID", |r: &EngDeviceRow| {
            CellValue::from(r.id.as_str())
        })
        .sortable(),
        Column::new("location", "Location", |r: &EngDeviceRow| {
            CellValue::from(r.location_name.as_str())
        })
        .sortable(),
        Column::new("company", "Company", |r: &EngDeviceRow| {
            CellValue::from(r.company_name.as_str())
        })
        .sortable(),
        Column::new("status", "Status", |r: &EngDeviceRow| {
            CellValue::from(r.status.map(|s| s.label()))
        })
        .sortable(),
        Column::new("firmware", "Firmware", |r: &EngDeviceRow| {
            CellValue::from(r.firmware_version.clone())
        })
        .sortable(),
        Column::new("lastSeen", "Last Seen", |r: &EngDeviceRow| {
            CellValue::from(r.last_seen)
        })
        .sortable(),
        Column::new("alerts", "Alerts", |r: &EngDeviceRow| {
            CellValue::Number(r.alerts_count as f64)
        })
        .sortable(),
    ];
    DataTable::new(columns).with_empty_message("No devices in scope")
}

/// Row selection for bulk actions
#[derive(Debug, Clone, Default)]
pub struct DeviceSelection {
    selected: AHashSet<DeviceId>,
}

impl DeviceSelection {
    pub fn toggle(&mut self, id: &DeviceId) {
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
    }

    pub fn is_selected(&self, id: &DeviceId) -> bool {
        self.selected.contains(id)
    }

    /// Select every visible row, or clear when all of them already are
    pub fn toggle_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a DeviceId>) {
        let visible: Vec<&DeviceId> = visible.into_iter().collect();
        if !visible.is_empty() && visible.iter().all(|id| self.selected.contains(*id)) {
            for id in visible {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(visible.into_iter().cloned());
        }
    }

    /// Drop ids that are no longer in the list
    pub fn retain_known(&mut self, refs: &ReferenceStore) {
        self.selected.retain(|id| refs.device(id).is_some());
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Bulk firmware push is offered for a non-empty selection only
    pub fn can_bulk_push(&self, caps: CapabilitySet) -> bool {
        !self.is_empty() && caps.contains(Capability::CanPushFirmware)
    }
}

// ==================== Diagnostics ====================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// `None` shows every level
    pub level: Option<LogLevel>,
    pub query: String,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let query = self.query.trim().to_lowercase();
        self.level.is_none_or(|level| entry.level == level)
            && (query.is_empty() || entry.message.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryPoint {
    /// "T1", "T2", ... in feed order
    pub label: String,
    pub temp_c: f64,
    pub motor_load_pct: f64,
}

pub fn telemetry_points(entries: &[TelemetryEntry]) -> Vec<TelemetryPoint> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| TelemetryPoint {
            label: format!("T{}", i + 1),
            temp_c: e.temp_c,
            motor_load_pct: e.motor_load_pct,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    Reboot,
    RunSelfTest,
    PushFirmware,
}

impl DeviceAction {
    pub const ALL: [DeviceAction; 3] = [
        DeviceAction::Reboot,
        DeviceAction::RunSelfTest,
        DeviceAction::PushFirmware,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DeviceAction::Reboot => "Reboot",
            DeviceAction::RunSelfTest => "Run self-test",
            DeviceAction::PushFirmware => "Push firmware",
        }
    }

    pub fn required(&self) -> Capability {
        match self {
            DeviceAction::Reboot | DeviceAction::RunSelfTest => Capability::CanSendRemoteCommands,
            DeviceAction::PushFirmware => Capability::CanPushFirmware,
        }
    }
}

/// Actions the session may trigger on a single device
pub fn available_actions(caps: CapabilitySet) -> Vec<DeviceAction> {
    DeviceAction::ALL
        .into_iter()
        .filter(|a| caps.contains(a.required()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsView {
    pub device: Device,
    pub location_name: String,
    pub company_name: String,
    pub status: Option<DeviceStatus>,
    pub logs: Vec<LogEntry>,
    pub telemetry: Vec<TelemetryPoint>,
    pub actions: Vec<DeviceAction>,
}

/// Resolve a device by id or name and assemble its diagnostics page.
/// `None` when the device is unknown.
pub fn diagnostics_view(
    refs: &ReferenceStore,
    id_or_name: &str,
    diagnostics: &Diagnostics,
    filter: &LogFilter,
    caps: CapabilitySet,
) -> Option<DiagnosticsView> {
    let device = refs.find_device(id_or_name)?.clone();
    let logs = diagnostics
        .logs
        .as_ref()
        .map(|l| l.entries.iter().filter(|e| filter.matches(e)).cloned().collect())
        .unwrap_or_default();
    let telemetry = diagnostics
        .telemetry
        .as_ref()
        .map(|t| telemetry_points(&t.entries))
        .unwrap_or_default();
    Some(DiagnosticsView {
        location_name: refs.location_name(&device.location_id).to_string(),
        company_name: refs
            .company_of_device(&device.id)
            .map_or_else(|| "Unknown".to_string(), |c| c.name.clone()),
        status: diagnostics.status.clone(),
        logs,
        telemetry,
        actions: available_actions(caps),
        device,
    })
}
