//! Data Source Boundary
//!
//! The async interface every view reads through. Lookups that find nothing return
//! `None` or an empty list; `Err` is reserved for the fetch itself failing.

use crate::domain::{
    Alert, Catalog, CompanyId, DateRangeKey, DeviceId, DeviceStatus, Diagnostics,
    FirmwareRelease, LocationId, Metrics,
};
use crate::error::Result;
use std::future::Future;

/// Parameters for the business overview query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewQuery {
    pub company_id: Option<CompanyId>,
    pub date_range_key: DateRangeKey,
}

/// Parameters for the fleet status query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetQuery {
    pub company_id: Option<CompanyId>,
    pub location_id: Option<LocationId>,
    /// Restrict to these devices; empty means no restriction
    pub device_ids: Vec<DeviceId>,
}

/// Parameters for the alerts query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertQuery {
    pub company_id: Option<CompanyId>,
    pub location_id: Option<LocationId>,
    pub device_id: Option<DeviceId>,
}

pub trait DataSource: Send + Sync + 'static {
    /// Reference entities (companies, locations, devices, staff, reports)
    fn catalog(&self) -> impl Future<Output = Result<Catalog>> + Send;

    /// Metrics for one company and range key; `None` without a company
    fn business_overview(
        &self,
        query: OverviewQuery,
    ) -> impl Future<Output = Result<Option<Metrics>>> + Send;

    fn fleet_status(
        &self,
        query: FleetQuery,
    ) -> impl Future<Output = Result<Vec<DeviceStatus>>> + Send;

    fn alerts(&self, query: AlertQuery) -> impl Future<Output = Result<Vec<Alert>>> + Send;

    /// Status, logs, and telemetry for one device; all parts empty without a device
    fn device_diagnostics(
        &self,
        device_id: Option<DeviceId>,
    ) -> impl Future<Output = Result<Diagnostics>> + Send;

    fn firmware_releases(&self) -> impl Future<Output = Result<Vec<FirmwareRelease>>> + Send;
}
