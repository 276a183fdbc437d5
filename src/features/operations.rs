//! Operations Views
//!
//! Fleet health, the alert queue, and per-location health rollups. Rows are
//! joined against the reference store at read time so renamed entities show up
//! without a refetch.

use crate::components::data_table::{CellValue, Column, DataTable};
use crate::domain::{
    Alert, AlertId, AlertSeverity, AlertState, CompanyId, DeviceHealth, DeviceId, DeviceStatus,
    LocationId,
};
use crate::error::{Error, Result};
use crate::features::filters::PageFilters;
use crate::states::ReferenceStore;
use crate::utils::{format_datetime, format_relative, truncate};
use ahash::AHashMap;
use chrono::{DateTime, Utc};

const ALERT_SUMMARY_LEN: usize = 80;

// ==================== Fleet ====================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(DeviceHealth),
}

impl StatusFilter {
    pub fn matches(&self, health: DeviceHealth) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == health,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleetRow {
    pub device_id: DeviceId,
    pub device_name: String,
    pub status: DeviceHealth,
    pub location_name: String,
    pub firmware_version: String,
    pub last_seen: DateTime<Utc>,
    pub cycles_7d: u32,
    pub needs_maintenance: bool,
}

pub fn fleet_rows(
    refs: &ReferenceStore,
    statuses: &[DeviceStatus],
    filter: StatusFilter,
) -> Vec<FleetRow> {
    statuses
        .iter()
        .filter(|s| filter.matches(s.status))
        .map(|s| {
            let device = refs.device(&s.device_id);
            FleetRow {
                device_id: s.device_id.clone(),
                device_name: device.map_or_else(|| s.device_id.to_string(), |d| d.name.clone()),
                status: s.status,
                location_name: device
                    .map_or("Unknown", |d| refs.location_name(&d.location_id))
                    .to_string(),
                firmware_version: s.firmware_version.clone(),
                last_seen: s.last_seen,
                cycles_7d: s.cycles_7d,
                needs_maintenance: s.needs_maintenance,
            }
        })
        .collect()
}

/// Count of rows per health state, in display order
pub fn fleet_summary(statuses: &[DeviceStatus]) -> [(DeviceHealth, usize); 3] {
    let count = |h: DeviceHealth| statuses.iter().filter(|s| s.status == h).count();
    [
        (DeviceHealth::Online, count(DeviceHealth::Online)),
        (DeviceHealth::Offline, count(DeviceHealth::Offline)),
        (DeviceHealth::Maintenance, count(DeviceHealth::Maintenance)),
    ]
}

/// Fleet table; the search box matches device name, location, and firmware
pub fn fleet_table() -> DataTable<FleetRow> {
    let columns = vec![
        Column::new("device", "Device", |r: &FleetRow| {
            CellValue::from(r.device_name.as_str())
        })
        .sortable(),
        Column::new("status", "Status", |r: &FleetRow| {
            CellValue::from(r.status.label())
        })
        .sortable(),
        Column::new("location", "Location", |r: &FleetRow| {
            CellValue::from(r.location_name.as_str())
        })
        .sortable(),
        Column::new("firmware", "Firmware", |r: &FleetRow| {
            CellValue::from(r.firmware_version.as_str())
        })
        .sortable(),
        Column::new("lastSeen", "Last Seen", |r: &FleetRow| {
            CellValue::from(r.last_seen)
        })
        .sortable(),
        Column::new("cycles7d", "Cycles (7d)", |r: &FleetRow| {
            CellValue::from(r.cycles_7d)
        })
        .sortable(),
        Column::new("maintenance", "Maintenance", |r: &FleetRow| {
            CellValue::from(if r.needs_maintenance { "Required" } else { "OK" })
        }),
    ];
    DataTable::new(columns)
        .with_filter(|row: &FleetRow, query: &str| {
            row.device_name.to_lowercase().contains(query)
                || row.location_name.to_lowercase().contains(query)
                || row.firmware_version.to_lowercase().contains(query)
        })
        .with_empty_message("No devices match the current filters")
}

// ==================== Alerts ====================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub severity: Option<AlertSeverity>,
    pub state: Option<AlertState>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        self.severity.is_none_or(|s| s == alert.severity)
            && self.state.is_none_or(|s| s == alert.state)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRow {
    pub alert: Alert,
    pub device_name: String,
    pub location_name: String,
    pub company_name: String,
}

impl AlertRow {
    /// Description clipped for the list view
    pub fn summary(&self) -> String {
        truncate(&self.alert.description, ALERT_SUMMARY_LEN)
    }

    pub fn age(&self, now: &DateTime<Utc>) -> String {
        format_relative(&self.alert.created_at, now)
    }

    pub fn updated_label(&self) -> String {
        format_datetime(&self.alert.updated_at)
    }
}

pub fn alert_rows(refs: &ReferenceStore, alerts: &[Alert], filter: AlertFilter) -> Vec<AlertRow> {
    alerts
        .iter()
        .filter(|a| filter.matches(a))
        .map(|a| AlertRow {
            device_name: refs.device_name(&a.device_id).to_string(),
            location_name: refs.location_name(&a.location_id).to_string(),
            company_name: refs.company_name(&a.company_id).to_string(),
            alert: a.clone(),
        })
        .collect()
}

pub fn alert_table() -> DataTable<AlertRow> {
    let columns = vec![
        Column::new("severity", "Severity", |r: &AlertRow| {
            CellValue::from(r.alert.severity.label())
        })
        .sortable(),
        Column::new("title", "Alert", |r: &AlertRow| {
            CellValue::from(r.alert.title.as_str())
        })
        .sortable(),
        Column::new("device", "Device", |r: &AlertRow| {
            CellValue::from(r.device_name.as_str())
        })
        .sortable(),
        Column::new("location", "Location", |r: &AlertRow| {
            CellValue::from(r.location_name.as_str())
        })
        .sortable(),
        Column::new("state", "State", |r: &AlertRow| {
            CellValue::from(r.alert.state.label())
        })
        .sortable(),
        Column::new("updatedAt", "Updated", |r: &AlertRow| {
            CellValue::from(r.alert.updated_at)
        })
        .sortable(),
    ];
    DataTable::new(columns)
        .with_filter(|row: &AlertRow, query: &str| {
            row.alert.title.to_lowercase().contains(query)
                || row.device_name.to_lowercase().contains(query)
                || row.location_name.to_lowercase().contains(query)
        })
        .with_empty_message("No alerts")
}

/// Move an alert along open → ack → resolved. Going backwards is rejected.
pub fn transition_alert(
    alerts: &mut [Alert],
    id: &AlertId,
    target: AlertState,
    now: DateTime<Utc>,
) -> Result<()> {
    let alert = alerts
        .iter_mut()
        .find(|a| &a.id == id)
        .ok_or_else(|| Error::Invalid {
            message: format!("unknown alert {id}"),
        })?;
    let allowed = matches!(
        (alert.state, target),
        (AlertState::Open, AlertState::Ack)
            | (AlertState::Open, AlertState::Resolved)
            | (AlertState::Ack, AlertState::Resolved)
    );
    if !allowed {
        return Err(Error::Invalid {
            message: format!(
                "alert {id} cannot move from {} to {}",
                alert.state.label(),
                target.label()
            ),
        });
    }
    alert.state = target;
    alert.updated_at = now;
    tracing::info!(alert = %id, state = target.label(), "Alert state changed");
    Ok(())
}

// ==================== Locations ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationHealthRow {
    pub location_id: LocationId,
    pub location_name: String,
    pub company_id: CompanyId,
    pub company_name: String,
    pub devices: usize,
    pub online: usize,
    pub offline: usize,
    pub maintenance: usize,
    pub open_alerts: usize,
}

pub fn location_health_rows(
    refs: &ReferenceStore,
    filters: &PageFilters,
    statuses: &[DeviceStatus],
    alerts: &[Alert],
) -> Vec<LocationHealthRow> {
    let health: AHashMap<&DeviceId, DeviceHealth> =
        statuses.iter().map(|s| (&s.device_id, s.status)).collect();
    refs.locations()
        .iter()
        .filter(|l| filters.matches(&l.company_id, &l.id))
        .map(|l| {
            let mut row = LocationHealthRow {
                location_id: l.id.clone(),
                location_name: l.name.clone(),
                company_id: l.company_id.clone(),
                company_name: refs.company_name(&l.company_id).to_string(),
                devices: 0,
                online: 0,
                offline: 0,
                maintenance: 0,
                open_alerts: 0,
            };
            for device in refs.devices_at(&l.id) {
                row.devices += 1;
                match health.get(&device.id) {
                    Some(DeviceHealth::Online) => row.online += 1,
                    Some(DeviceHealth::Offline) => row.offline += 1,
                    Some(DeviceHealth::Maintenance) => row.maintenance += 1,
                    None => {}
                }
            }
            row.open_alerts = alerts
                .iter()
                .filter(|a| a.location_id == l.id && a.state != AlertState::Resolved)
                .count();
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::reference::fixtures::two_company_store;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).single().expect("valid")
    }

    fn status(device: &str, health: DeviceHealth, firmware: &str) -> DeviceStatus {
        DeviceStatus {
            device_id: device.into(),
            status: health,
            last_seen: at(8),
            firmware_version: firmware.into(),
            cycles_7d: 12,
            needs_maintenance: health == DeviceHealth::Maintenance,
        }
    }

    fn alert(
        id: &str,
        device: &str,
        location: &str,
        severity: AlertSeverity,
        state: AlertState,
    ) -> Alert {
        Alert {
            id: id.into(),
            company_id: "co-a".into(),
            location_id: location.into(),
            device_id: device.into(),
            severity,
            state,
            title: format!("Alert {id}"),
            description: String::new(),
            created_at: at(6),
            updated_at: at(6),
        }
    }

    fn statuses() -> Vec<DeviceStatus> {
        vec![
            status("dev-1a", DeviceHealth::Online, "1.4.0"),
            status("dev-1b", DeviceHealth::Offline, "1.3.2"),
            status("dev-2a", DeviceHealth::Maintenance, "1.4.0"),
            status("ghost", DeviceHealth::Online, "1.0.0"),
        ]
    }

    #[test]
    fn test_fleet_rows_join_and_fallbacks() {
        let rows = fleet_rows(&two_company_store(), &statuses(), StatusFilter::All);
        assert_eq!(rows[0].device_name, "Unit 1A");
        assert_eq!(rows[0].location_name, "Downtown");
        assert_eq!(rows[3].device_name, "ghost");
        assert_eq!(rows[3].location_name, "Unknown");
    }

    #[test]
    fn test_fleet_status_filter_and_search() {
        let refs = two_company_store();
        let offline = fleet_rows(&refs, &statuses(), StatusFilter::Only(DeviceHealth::Offline));
        assert_eq!(offline.len(), 1);

        let rows = fleet_rows(&refs, &statuses(), StatusFilter::All);
        let mut table = fleet_table();
        table.set_query("1.3");
        assert_eq!(table.view(&rows[..]).matched, 1);
        table.set_query("harbor");
        assert_eq!(table.view(&rows[..]).rows[0].device_id.as_str(), "dev-2a");
    }

    #[test]
    fn test_fleet_summary() {
        let summary = fleet_summary(&statuses());
        assert_eq!(summary[0], (DeviceHealth::Online, 2));
        assert_eq!(summary[2], (DeviceHealth::Maintenance, 1));
    }

    #[test]
    fn test_alert_filters() {
        let alerts = vec![
            alert("a1", "dev-1a", "loc-1", AlertSeverity::Critical, AlertState::Open),
            alert("a2", "dev-2a", "loc-2", AlertSeverity::Warn, AlertState::Ack),
            alert("a3", "dev-2b", "loc-2", AlertSeverity::Critical, AlertState::Resolved),
        ];
        let refs = two_company_store();
        let critical = AlertFilter {
            severity: Some(AlertSeverity::Critical),
            state: None,
        };
        assert_eq!(alert_rows(&refs, &alerts, critical).len(), 2);
        let open_critical = AlertFilter {
            state: Some(AlertState::Open),
            ..critical
        };
        let rows = alert_rows(&refs, &alerts, open_critical);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].device_name, "Unit 1A");
        assert_eq!(rows[0].company_name, "Acme");
        assert_eq!(rows[0].age(&at(9)), "3h ago");
    }

    #[test]
    fn test_alert_summary_is_clipped() {
        let mut long = alert("a1", "dev-1a", "loc-1", AlertSeverity::Info, AlertState::Open);
        long.description = "x".repeat(120);
        let rows = alert_rows(&two_company_store(), &[long], AlertFilter::default());
        let summary = rows[0].summary();
        assert_eq!(summary.chars().count(), ALERT_SUMMARY_LEN);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_alert_transitions() {
        let mut alerts = vec![alert(
            "a1",
            "dev-1a",
            "loc-1",
            AlertSeverity::Info,
            AlertState::Open,
        )];
        let id = AlertId::from("a1");
        transition_alert(&mut alerts, &id, AlertState::Ack, at(9)).expect("ack");
        assert_eq!((alerts[0].state, alerts[0].updated_at), (AlertState::Ack, at(9)));
        assert!(transition_alert(&mut alerts, &id, AlertState::Open, at(10)).is_err());
        transition_alert(&mut alerts, &id, AlertState::Resolved, at(11)).expect("resolve");
        assert!(transition_alert(&mut alerts, &"zz".into(), AlertState::Ack, at(11)).is_err());
    }

    #[test]
    fn test_location_health() {
        let refs = two_company_store();
        let alerts = vec![
            alert("a1", "dev-1a", "loc-1", AlertSeverity::Warn, AlertState::Open),
            alert("a2", "dev-1b", "loc-1", AlertSeverity::Warn, AlertState::Resolved),
        ];
        let rows = location_health_rows(&refs, &PageFilters::default(), &statuses(), &alerts);
        let downtown = &rows[0];
        assert_eq!((downtown.devices, downtown.online, downtown.offline), (2, 1, 1));
        assert_eq!(downtown.open_alerts, 1);
        assert_eq!(rows[2].online + rows[2].offline + rows[2].maintenance, 0);
    }
}
