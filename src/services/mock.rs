//! Mock Data Source
//!
//! Serves the JSON fixtures bundled under `assets/mock` with a simulated network
//! delay. The delay is picked from the configured window by hashing a request
//! counter, so runs are reproducible. A failure switch makes every call return
//! `Error::Load` for exercising error states, and a per-company slowdown lets a
//! caller force responses to arrive out of order.

use crate::constants::{FETCH_LATENCY_MAX_MS, FETCH_LATENCY_MIN_MS};
use crate::domain::{
    Alert, Catalog, CompanyId, DeviceId, DeviceLog, DeviceStatus, DeviceTelemetry, Diagnostics,
    FirmwareRelease, Metrics,
};
use crate::error::{Error, Result};
use crate::services::source::{AlertQuery, DataSource, FleetQuery, OverviewQuery};
use ahash::AHashSet;
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

#[derive(RustEmbed)]
#[folder = "assets/mock"]
struct MockAssets;

fn load_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let file = MockAssets::get(path).ok_or_else(|| Error::MissingAsset {
        path: path.to_string(),
    })?;
    Ok(serde_json::from_slice(&file.data)?)
}

/// Every fixture table the mock serves
#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub catalog: Catalog,
    pub device_status: Vec<DeviceStatus>,
    pub alerts: Vec<Alert>,
    pub metrics: Vec<Metrics>,
    pub logs: Vec<DeviceLog>,
    pub telemetry: Vec<DeviceTelemetry>,
    pub firmware: Vec<FirmwareRelease>,
}

impl MockData {
    /// Parse the bundled fixtures
    pub fn embedded() -> Result<Self> {
        let data = Self {
            catalog: Catalog {
                companies: load_json("companies.json")?,
                locations: load_json("locations.json")?,
                devices: load_json("devices.json")?,
                staff: load_json("staff.json")?,
                reports: load_json("reports.json")?,
            },
            device_status: load_json("device-status.json")?,
            alerts: load_json("alerts.json")?,
            metrics: load_json("metrics.json")?,
            logs: load_json("logs.json")?,
            telemetry: load_json("telemetry.json")?,
            firmware: load_json("firmware.json")?,
        };
        tracing::debug!(
            companies = data.catalog.companies.len(),
            devices = data.catalog.devices.len(),
            alerts = data.alerts.len(),
            "Loaded mock fixtures"
        );
        Ok(data)
    }

    /// Devices matching the company/location narrowing, by id
    fn devices_in_scope(&self, query: &FleetQuery) -> AHashSet<DeviceId> {
        self.catalog
            .devices
            .iter()
            .filter(|device| {
                if let Some(location) = &query.location_id
                    && &device.location_id != location
                {
                    return false;
                }
                match &query.company_id {
                    Some(company) => self
                        .catalog
                        .locations
                        .iter()
                        .find(|l| l.id == device.location_id)
                        .is_some_and(|l| &l.company_id == company),
                    None => true,
                }
            })
            .map(|device| device.id.clone())
            .collect()
    }
}

/// Simulated latency bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub min: Duration,
    pub max: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(FETCH_LATENCY_MIN_MS),
            max: Duration::from_millis(FETCH_LATENCY_MAX_MS),
        }
    }
}

impl Latency {
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Delay for the `n`-th request, uniform over the window
    pub fn pick(&self, n: u64) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = (self.max.as_millis() as u64).max(min);
        let span = max - min + 1;
        let spread = n.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32;
        Duration::from_millis(min + spread % span)
    }
}

pub struct MockDataSource {
    data: MockData,
    latency: Latency,
    requests: AtomicU64,
    failing: AtomicBool,
    slow_company: Option<(CompanyId, Duration)>,
}

impl MockDataSource {
    pub fn new(data: MockData) -> Self {
        Self {
            data,
            latency: Latency::default(),
            requests: AtomicU64::new(0),
            failing: AtomicBool::new(false),
            slow_company: None,
        }
    }

    /// Bundled fixtures with the default latency window
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(MockData::embedded()?))
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Delay scoped calls for `company` by `extra` on top of the latency window
    pub fn with_slow_company(mut self, company: CompanyId, extra: Duration) -> Self {
        self.slow_company = Some((company, extra));
        self
    }

    pub fn data(&self) -> &MockData {
        &self.data
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    async fn simulate(&self, view: &'static str, company: Option<&CompanyId>) -> Result<()> {
        let n = self.requests.fetch_add(1, Ordering::SeqCst);
        let mut delay = self.latency.pick(n);
        if let Some((slow, extra)) = &self.slow_company
            && company == Some(slow)
        {
            delay += *extra;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            tracing::debug!(view, "Mock source failing request");
            return Err(Error::Load {
                view: view.to_string(),
                message: "simulated outage".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for MockDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDataSource")
            .field("latency", &self.latency)
            .field("requests", &self.request_count())
            .field("failing", &self.failing.load(Ordering::SeqCst))
            .finish()
    }
}

impl DataSource for MockDataSource {
    async fn catalog(&self) -> Result<Catalog> {
        self.simulate("catalog", None).await?;
        Ok(self.data.catalog.clone())
    }

    async fn business_overview(&self, query: OverviewQuery) -> Result<Option<Metrics>> {
        self.simulate("overview", query.company_id.as_ref()).await?;
        let Some(company) = query.company_id else {
            return Ok(None);
        };
        Ok(self
            .data
            .metrics
            .iter()
            .find(|m| m.company_id == company && m.date_range_key == query.date_range_key)
            .cloned())
    }

    async fn fleet_status(&self, query: FleetQuery) -> Result<Vec<DeviceStatus>> {
        self.simulate("fleet", query.company_id.as_ref()).await?;
        let mut rows: Vec<DeviceStatus> = self
            .data
            .device_status
            .iter()
            .filter(|s| query.device_ids.is_empty() || query.device_ids.contains(&s.device_id))
            .cloned()
            .collect();
        if query.company_id.is_some() || query.location_id.is_some() {
            let in_scope = self.data.devices_in_scope(&query);
            rows.retain(|s| in_scope.contains(&s.device_id));
        }
        Ok(rows)
    }

    async fn alerts(&self, query: AlertQuery) -> Result<Vec<Alert>> {
        self.simulate("alerts", query.company_id.as_ref()).await?;
        Ok(self
            .data
            .alerts
            .iter()
            .filter(|a| query.company_id.as_ref().is_none_or(|c| &a.company_id == c))
            .filter(|a| query.location_id.as_ref().is_none_or(|l| &a.location_id == l))
            .filter(|a| query.device_id.as_ref().is_none_or(|d| &a.device_id == d))
            .cloned()
            .collect())
    }

    async fn device_diagnostics(&self, device_id: Option<DeviceId>) -> Result<Diagnostics> {
        self.simulate("diagnostics", None).await?;
        let Some(device) = device_id else {
            return Ok(Diagnostics::default());
        };
        Ok(Diagnostics {
            status: self.data.device_status.iter().find(|s| s.device_id == device).cloned(),
            logs: self.data.logs.iter().find(|l| l.device_id == device).cloned(),
            telemetry: self.data.telemetry.iter().find(|t| t.device_id == device).cloned(),
        })
    }

    async fn firmware_releases(&self) -> Result<Vec<FirmwareRelease>> {
        self.simulate("firmware", None).await?;
        Ok(self.data.firmware.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateRangeKey;

    fn source() -> MockDataSource {
        MockDataSource::embedded()
            .expect("fixtures parse")
            .with_latency(Latency::none())
    }

    #[test]
    fn test_fixtures_parse() {
        let data = MockData::embedded().expect("fixtures parse");
        assert!(!data.catalog.companies.is_empty());
        assert!(!data.catalog.devices.is_empty());
        assert!(!data.firmware.is_empty());
    }

    #[test]
    fn test_latency_stays_in_window() {
        let latency = Latency::default();
        for n in 0..500 {
            let d = latency.pick(n);
            assert!(d >= latency.min && d <= latency.max, "{d:?}");
        }
        assert_eq!(Latency::none().pick(42), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_overview_requires_company() {
        let source = source();
        let none = source
            .business_overview(OverviewQuery {
                company_id: None,
                date_range_key: DateRangeKey::Last7,
            })
            .await
            .expect("fetch");
        assert!(none.is_none());

        let company = source.data().catalog.companies[0].id.clone();
        let some = source
            .business_overview(OverviewQuery {
                company_id: Some(company.clone()),
                date_range_key: DateRangeKey::Last30,
            })
            .await
            .expect("fetch")
            .expect("metrics present");
        assert_eq!(some.company_id, company);
        assert_eq!(some.date_range_key, DateRangeKey::Last30);
    }

    #[tokio::test]
    async fn test_slow_company_only_delays_its_own_calls() {
        let companies = MockData::embedded().expect("fixtures parse").catalog.companies;
        let slow = companies[0].id.clone();
        let source = source().with_slow_company(slow.clone(), Duration::from_millis(80));
        let query = |company: &CompanyId| OverviewQuery {
            company_id: Some(company.clone()),
            date_range_key: DateRangeKey::Last7,
        };

        let started = std::time::Instant::now();
        source.business_overview(query(&companies[1].id)).await.expect("fetch");
        assert!(started.elapsed() < Duration::from_millis(80));

        let started = std::time::Instant::now();
        source.business_overview(query(&slow)).await.expect("fetch");
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_fleet_narrowed_by_company() {
        let source = source();
        let all = source.fleet_status(FleetQuery::default()).await.expect("fetch");
        let company = source.data().catalog.companies[0].id.clone();
        let scoped = source
            .fleet_status(FleetQuery {
                company_id: Some(company.clone()),
                ..FleetQuery::default()
            })
            .await
            .expect("fetch");
        assert!(!scoped.is_empty());
        assert!(scoped.len() < all.len());
        for row in &scoped {
            let device = source
                .data()
                .catalog
                .devices
                .iter()
                .find(|d| d.id == row.device_id)
                .expect("device known");
            let location = source
                .data()
                .catalog
                .locations
                .iter()
                .find(|l| l.id == device.location_id)
                .expect("location known");
            assert_eq!(location.company_id, company);
        }
    }

    #[tokio::test]
    async fn test_alerts_filtered_by_device() {
        let source = source();
        let device = source.data().alerts[0].device_id.clone();
        let rows = source
            .alerts(AlertQuery {
                device_id: Some(device.clone()),
                ..AlertQuery::default()
            })
            .await
            .expect("fetch");
        assert!(rows.iter().all(|a| a.device_id == device));
    }

    #[tokio::test]
    async fn test_diagnostics_without_device_is_empty() {
        let diag = source().device_diagnostics(None).await.expect("fetch");
        assert_eq!(diag, Diagnostics::default());
    }

    #[tokio::test]
    async fn test_failure_switch() {
        let source = source();
        source.set_failing(true);
        let err = source.firmware_releases().await.expect_err("should fail");
        assert!(matches!(err, Error::Load { .. }));
        source.set_failing(false);
        assert!(source.firmware_releases().await.is_ok());
    }
}
