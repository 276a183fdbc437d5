//! Business Views
//!
//! Row builders for the business area: KPI overview, company and location
//! directories, devices, staff, and reports. All joins read the reference store;
//! missing parents render as "Unknown".

use crate::components::data_table::{CellValue, Column};
use crate::domain::{
    Alert, AlertState, Company, CompanyId, DateRangeKey, Device, DeviceHealth, DeviceId,
    DeviceStatus, LocationId, Metrics, ReportKind, StaffRole,
};
use crate::features::filters::PageFilters;
use crate::states::ReferenceStore;
use crate::utils::{format_number, format_quantity};
use ahash::AHashMap;
use chrono::{DateTime, Utc};

// ==================== Overview ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    pub label: &'static str,
    pub value: String,
    pub helper: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint {
    pub label: u32,
    pub cycles: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub range_key: DateRangeKey,
    pub range_label: &'static str,
    /// Empty when no company is selected or no metrics exist
    pub kpis: Vec<Kpi>,
    pub trend: Vec<TrendPoint>,
}

/// Seven-point synthetic throughput trend around the average daily cycles
fn trend(metrics: &Metrics) -> Vec<TrendPoint> {
    const POINTS: u32 = 7;
    let base = (metrics.cycles_completed as f64 / POINTS as f64).round().max(1.0) as i64;
    (0..POINTS)
        .map(|i| {
            let variance = if i % 2 == 0 { 3 } else { -2 };
            TrendPoint {
                label: i + 1,
                cycles: (base + variance + i as i64).max(0) as u32,
            }
        })
        .collect()
}

pub fn overview(metrics: Option<&Metrics>, range_key: DateRangeKey) -> OverviewView {
    let (kpis, trend) = match metrics {
        Some(m) => (
            vec![
                Kpi {
                    label: "CO2 avoided",
                    value: format_quantity(m.co2_avoided_kg, "kg"),
                    helper: "Estimated emissions avoided",
                },
                Kpi {
                    label: "Waste diverted",
                    value: format_quantity(m.waste_diverted_kg, "kg"),
                    helper: "Total diverted from landfill",
                },
                Kpi {
                    label: "Cycles completed",
                    value: format_number(i64::from(m.cycles_completed)),
                    helper: "Total processing cycles",
                },
                Kpi {
                    label: "Maintenance required",
                    value: m.maintenance_required_count.to_string(),
                    helper: "Active maintenance flags",
                },
            ],
            trend(m),
        ),
        None => (Vec::new(), Vec::new()),
    };
    OverviewView {
        range_key,
        range_label: range_key.label(),
        kpis,
        trend,
    }
}

// ==================== Companies ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRow {
    pub id: CompanyId,
    pub name: String,
    pub locations: usize,
    pub devices: usize,
}

pub fn company_rows(refs: &ReferenceStore) -> Vec<CompanyRow> {
    let mut locations: AHashMap<&CompanyId, usize> = AHashMap::new();
    for location in refs.locations() {
        *locations.entry(&location.company_id).or_default() += 1;
    }
    let mut devices: AHashMap<&CompanyId, usize> = AHashMap::new();
    for device in refs.devices() {
        if let Some(company) = refs.company_id_of_location(&device.location_id) {
            *devices.entry(company).or_default() += 1;
        }
    }
    refs.companies()
        .iter()
        .map(|c| CompanyRow {
            id: c.id.clone(),
            name: c.name.clone(),
            locations: locations.get(&c.id).copied().unwrap_or(0),
            devices: devices.get(&c.id).copied().unwrap_or(0),
        })
        .collect()
}

pub fn company_columns() -> Vec<Column<CompanyRow>> {
    vec![
        Column::new("name", "Company Name", |r: &CompanyRow| {
            CellValue::from(r.name.as_str())
        })
        .sortable(),
        Column::new("locations", "Locations", |r: &CompanyRow| {
            CellValue::Number(r.locations as f64)
        })
        .sortable(),
        Column::new("devices", "Devices", |r: &CompanyRow| {
            CellValue::Number(r.devices as f64)
        })
        .sortable(),
        Column::new("id", "Company ID", |r: &CompanyRow| CellValue::from(r.id.as_str())).sortable(),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyDetail {
    pub company: Company,
    pub locations: Vec<LocationRow>,
    pub device_count: usize,
    pub staff_count: usize,
    pub report_count: usize,
    pub open_alerts: usize,
}

/// `alerts` is the currently loaded alert feed, already scoped to the company
pub fn company_detail(
    refs: &ReferenceStore,
    id: &CompanyId,
    alerts: &[Alert],
) -> Option<CompanyDetail> {
    let company = refs.company(id)?.clone();
    let filters = PageFilters::default();
    let locations = location_rows(refs, &filters)
        .into_iter()
        .filter(|row| &row.company_id == id)
        .collect();
    Some(CompanyDetail {
        device_count: refs.devices_of(id).count(),
        staff_count: refs.staff().iter().filter(|s| &s.company_id == id).count(),
        report_count: refs.reports().iter().filter(|r| &r.company_id == id).count(),
        open_alerts: alerts
            .iter()
            .filter(|a| &a.company_id == id && a.state != AlertState::Resolved)
            .count(),
        company,
        locations,
    })
}

// ==================== Locations ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRow {
    pub id: LocationId,
    pub name: String,
    pub company_id: CompanyId,
    pub company_name: String,
    pub devices: usize,
}

pub fn location_rows(refs: &ReferenceStore, filters: &PageFilters) -> Vec<LocationRow> {
    refs.locations()
        .iter()
        .filter(|l| filters.matches(&l.company_id, &l.id))
        .map(|l| LocationRow {
            id: l.id.clone(),
            name: l.name.clone(),
            company_id: l.company_id.clone(),
            company_name: refs.company_name(&l.company_id).to_string(),
            devices: refs.devices_at(&l.id).count(),
        })
        .collect()
}

pub fn location_columns() -> Vec<Column<LocationRow>> {
    vec![
        Column::new("name", "Location Name", |r: &LocationRow| {
            CellValue::from(r.name.as_str())
        })
        .sortable(),
        Column::new("id", "Location ID", |r: &LocationRow| {
            CellValue::from(r.id.as_str())
        })
        .sortable(),
        Column::new("company", "Company", |r: &LocationRow| {
            CellValue::from(r.company_name.as_str())
        })
        .sortable(),
        Column::new("devices", "Devices", |r: &LocationRow| {
            CellValue::Number(r.devices as f64)
        })
        .sortable(),
    ]
}

// ==================== Devices ====================

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub id: DeviceId,
    pub name: String,
    pub location_name: String,
    pub company_name: String,
    /// `None` when the fleet feed has no entry for the device
    pub status: Option<DeviceHealth>,
}

fn status_index(statuses: &[DeviceStatus]) -> AHashMap<&DeviceId, &DeviceStatus> {
    statuses.iter().map(|s| (&s.device_id, s)).collect()
}

fn in_filters(refs: &ReferenceStore, filters: &PageFilters, device: &Device) -> bool {
    match refs.company_id_of_location(&device.location_id) {
        Some(company) => filters.matches(company, &device.location_id),
        None => filters.company().is_none() && filters.location().is_none(),
    }
}

pub fn device_rows(
    refs: &ReferenceStore,
    filters: &PageFilters,
    statuses: &[DeviceStatus],
) -> Vec<DeviceRow> {
    let by_id = status_index(statuses);
    refs.devices()
        .iter()
        .filter(|d| in_filters(refs, filters, d))
        .map(|d| DeviceRow {
            id: d.id.clone(),
            name: d.name.clone(),
            location_name: refs.location_name(&d.location_id).to_string(),
            company_name: refs
                .company_of_device(&d.id)
                .map_or_else(|| "Unknown".to_string(), |c| c.name.clone()),
            status: by_id.get(&d.id).map(|s| s.status),
        })
        .collect()
}

pub fn device_columns() -> Vec<Column<DeviceRow>> {
    vec![
        Column::new("name", "Device Name", |r: &DeviceRow| {
            CellValue::from(r.name.as_str())
        })
        .sortable(),
        Column::new("id", "Device ID", |r: &DeviceRow| CellValue::from(r.id.as_str())).sortable(),
        Column::new("location", "Location", |r: &DeviceRow| {
            CellValue::from(r.location_name.as_str())
        })
        .sortable(),
        Column::new("status", "Status", |r: &DeviceRow| {
            CellValue::from(r.status.map_or("unknown", |s| s.label()))
        })
        .sortable(),
        Column::new("company", "Company", |r: &DeviceRow| {
            CellValue::from(r.company_name.as_str())
        })
        .sortable(),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessDeviceDetail {
    pub device: Device,
    pub location_name: String,
    pub company_name: String,
    pub status: Option<DeviceStatus>,
    /// Whether the engineering diagnostics link is offered
    pub show_diagnostics_link: bool,
}

pub fn business_device_detail(
    refs: &ReferenceStore,
    id: &DeviceId,
    statuses: &[DeviceStatus],
    can_view_eng: bool,
) -> Option<BusinessDeviceDetail> {
    let device = refs.device(id)?.clone();
    Some(BusinessDeviceDetail {
        location_name: refs.location_name(&device.location_id).to_string(),
        company_name: refs
            .company_of_device(id)
            .map_or_else(|| "Unknown".to_string(), |c| c.name.clone()),
        status: statuses.iter().find(|s| &s.device_id == id).cloned(),
        show_diagnostics_link: can_view_eng,
        device,
    })
}

// ==================== Staff ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    pub location_name: String,
    pub company_name: String,
}

pub fn staff_rows(refs: &ReferenceStore, filters: &PageFilters) -> Vec<StaffRow> {
    refs.staff()
        .iter()
        .filter(|s| filters.matches(&s.company_id, &s.location_id))
        .map(|s| StaffRow {
            id: s.id.to_string(),
            name: s.name.clone(),
            email: s.email.clone(),
            role: s.role,
            location_name: refs.location_name(&s.location_id).to_string(),
            company_name: refs.company_name(&s.company_id).to_string(),
        })
        .collect()
}

pub fn staff_columns() -> Vec<Column<StaffRow>> {
    vec![
        Column::new("name", "Name", |r: &StaffRow| CellValue::from(r.name.as_str())).sortable(),
        Column::new("email", "Email", |r: &StaffRow| CellValue::from(r.email.as_str())).sortable(),
        Column::new("role", "Role", |r: &StaffRow| {
            CellValue::from(format!("{:?}", r.role))
        })
        .sortable(),
        Column::new("location", "Location", |r: &StaffRow| {
            CellValue::from(r.location_name.as_str())
        })
        .sortable(),
        Column::new("company", "Company", |r: &StaffRow| {
            CellValue::from(r.company_name.as_str())
        })
        .sortable(),
    ]
}

// ==================== Reports ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: String,
    pub name: String,
    pub kind: ReportKind,
    pub location_name: String,
    pub company_name: String,
    pub created_at: Option<DateTime<Utc>>,
}

pub fn report_rows(refs: &ReferenceStore, filters: &PageFilters) -> Vec<ReportRow> {
    refs.reports()
        .iter()
        .filter(|r| filters.matches(&r.company_id, &r.location_id))
        .map(|r| ReportRow {
            id: r.id.to_string(),
            name: r.name.clone(),
            kind: r.kind,
            location_name: refs.location_name(&r.location_id).to_string(),
            company_name: refs.company_name(&r.company_id).to_string(),
            created_at: r.created_at,
        })
        .collect()
}

pub fn report_columns() -> Vec<Column<ReportRow>> {
    vec![
        Column::new("name", "Report", |r: &ReportRow| CellValue::from(r.name.as_str())).sortable(),
        Column::new("type", "Type", |r: &ReportRow| {
            CellValue::from(format!("{:?}", r.kind))
        })
        .sortable(),
        Column::new("location", "Location", |r: &ReportRow| {
            CellValue::from(r.location_name.as_str())
        })
        .sortable(),
        Column::new("company", "Company", |r: &ReportRow| {
            CellValue::from(r.company_name.as_str())
        })
        .sortable(),
        Column::new("created", "Created", |r: &ReportRow| CellValue::from(r.created_at)).sortable(),
    ]
}
