//! Reference Store
//!
//! Normalized client-side copy of the catalog: companies, locations, devices,
//! staff, and reports, with id indices and the cross-entity joins the views need.
//! Every mutation bumps `revision` so dependent rules know to re-run.

use crate::domain::{
    Catalog, Company, CompanyId, Device, DeviceId, Location, LocationId, Report, Staff,
};
use ahash::AHashMap;

#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    companies: Vec<Company>,
    locations: Vec<Location>,
    devices: Vec<Device>,
    staff: Vec<Staff>,
    reports: Vec<Report>,
    location_index: AHashMap<LocationId, usize>,
    device_index: AHashMap<DeviceId, usize>,
    revision: u64,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        let mut store = Self::new();
        store.replace(catalog);
        store
    }

    /// Swap in a whole new snapshot
    pub fn replace(&mut self, catalog: Catalog) {
        self.companies = catalog.companies;
        self.locations = catalog.locations;
        self.devices = catalog.devices;
        self.staff = catalog.staff;
        self.reports = catalog.reports;
        self.reindex();
        self.revision += 1;
        tracing::debug!(
            companies = self.companies.len(),
            locations = self.locations.len(),
            devices = self.devices.len(),
            revision = self.revision,
            "Reference snapshot replaced"
        );
    }

    fn reindex(&mut self) {
        self.location_index = self
            .locations
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id.clone(), i))
            .collect();
        self.device_index = self
            .devices
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
    }

    // ==================== Getters ====================

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn company(&self, id: &CompanyId) -> Option<&Company> {
        self.companies.iter().find(|c| &c.id == id)
    }

    pub fn location(&self, id: &LocationId) -> Option<&Location> {
        self.location_index.get(id).and_then(|i| self.locations.get(*i))
    }

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.device_index.get(id).and_then(|i| self.devices.get(*i))
    }

    /// Look a device up by id, then by case-insensitive name
    pub fn find_device(&self, id_or_name: &str) -> Option<&Device> {
        self.device(&DeviceId::from(id_or_name)).or_else(|| {
            let target = id_or_name.to_lowercase();
            self.devices.iter().find(|d| d.name.to_lowercase() == target)
        })
    }

    // ==================== Joins ====================

    pub fn locations_of<'a>(
        &'a self,
        company: &'a CompanyId,
    ) -> impl Iterator<Item = &'a Location> + 'a {
        self.locations.iter().filter(move |l| &l.company_id == company)
    }

    pub fn devices_at<'a>(
        &'a self,
        location: &'a LocationId,
    ) -> impl Iterator<Item = &'a Device> + 'a {
        self.devices.iter().filter(move |d| &d.location_id == location)
    }

    /// Devices under any location of `company`
    pub fn devices_of<'a>(
        &'a self,
        company: &'a CompanyId,
    ) -> impl Iterator<Item = &'a Device> + 'a {
        self.devices
            .iter()
            .filter(move |d| self.company_id_of_location(&d.location_id) == Some(company))
    }

    pub fn company_id_of_location(&self, location: &LocationId) -> Option<&CompanyId> {
        self.location(location).map(|l| &l.company_id)
    }

    pub fn location_of_device(&self, device: &DeviceId) -> Option<&Location> {
        self.device(device).and_then(|d| self.location(&d.location_id))
    }

    pub fn company_of_device(&self, device: &DeviceId) -> Option<&Company> {
        self.location_of_device(device)
            .and_then(|l| self.company(&l.company_id))
    }

    pub fn location_name(&self, id: &LocationId) -> &str {
        self.location(id).map(|l| l.name.as_str()).unwrap_or("Unknown")
    }

    pub fn company_name(&self, id: &CompanyId) -> &str {
        self.company(id).map(|c| c.name.as_str()).unwrap_or("Unknown")
    }

    pub fn device_name<'a>(&'a self, id: &'a DeviceId) -> &'a str {
        self.device(id).map(|d| d.name.as_str()).unwrap_or(id.as_str())
    }

    // ==================== Mutations ====================

    /// New rows are shown first
    pub fn add_company(&mut self, company: Company) {
        self.companies.insert(0, company);
        self.revision += 1;
    }

    pub fn add_location(&mut self, location: Location) {
        self.locations.insert(0, location);
        self.reindex();
        self.revision += 1;
    }

    pub fn add_device(&mut self, device: Device) {
        self.devices.insert(0, device);
        self.reindex();
        self.revision += 1;
    }

    pub fn add_staff(&mut self, staff: Staff) {
        self.staff.insert(0, staff);
        self.revision += 1;
    }

    pub fn add_report(&mut self, report: Report) {
        self.reports.insert(0, report);
        self.revision += 1;
    }

    /// Drop a location and everything hanging off it
    pub fn remove_location(&mut self, id: &LocationId) -> bool {
        let before = self.locations.len();
        self.locations.retain(|l| &l.id != id);
        if self.locations.len() == before {
            return false;
        }
        self.devices.retain(|d| &d.location_id != id);
        self.staff.retain(|s| &s.location_id != id);
        self.reports.retain(|r| &r.location_id != id);
        self.reindex();
        self.revision += 1;
        true
    }

    pub fn remove_device(&mut self, id: &DeviceId) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| &d.id != id);
        if self.devices.len() == before {
            return false;
        }
        self.reindex();
        self.revision += 1;
        true
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Company A with L1, L2; company B with L3. Two devices per location.
    pub fn two_company_store() -> ReferenceStore {
        let companies = vec![
            Company {
                id: "co-a".into(),
                name: "Acme".into(),
            },
            Company {
                id: "co-b".into(),
                name: "Bistro Group".into(),
            },
        ];
        let locations = vec![
            location("loc-1", "Downtown", "co-a"),
            location("loc-2", "Harbor", "co-a"),
            location("loc-3", "Uptown", "co-b"),
        ];
        let devices = vec![
            device("dev-1a", "Unit 1A", "loc-1"),
            device("dev-1b", "Unit 1B", "loc-1"),
            device("dev-2a", "Unit 2A", "loc-2"),
            device("dev-2b", "Unit 2B", "loc-2"),
            device("dev-3a", "Unit 3A", "loc-3"),
            device("dev-3b", "Unit 3B", "loc-3"),
        ];
        ReferenceStore::from_catalog(Catalog {
            companies,
            locations,
            devices,
            staff: Vec::new(),
            reports: Vec::new(),
        })
    }

    pub fn location(id: &str, name: &str, company: &str) -> Location {
        Location {
            id: id.into(),
            name: name.into(),
            company_id: company.into(),
        }
    }

    pub fn device(id: &str, name: &str, location: &str) -> Device {
        Device {
            id: id.into(),
            name: name.into(),
            location_id: location.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_joins() {
        let store = two_company_store();
        let a = CompanyId::from("co-a");
        let ids: Vec<_> = store.locations_of(&a).map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["loc-1", "loc-2"]);
        assert_eq!(store.devices_of(&a).count(), 4);
        let loc3 = LocationId::from("loc-3");
        assert_eq!(store.devices_at(&loc3).count(), 2);
        assert_eq!(
            store.company_of_device(&"dev-3b".into()).map(|c| c.name.as_str()),
            Some("Bistro Group")
        );
    }

    #[test]
    fn test_find_device_by_name() {
        let store = two_company_store();
        assert_eq!(store.find_device("unit 2a").map(|d| d.id.as_str()), Some("dev-2a"));
        assert_eq!(store.find_device("dev-1b").map(|d| d.name.as_str()), Some("Unit 1B"));
        assert!(store.find_device("missing").is_none());
    }

    #[test]
    fn test_add_prepends_and_bumps_revision() {
        let mut store = two_company_store();
        let rev = store.revision();
        store.add_location(location("loc-9", "Airport", "co-b"));
        assert_eq!(store.locations()[0].id.as_str(), "loc-9");
        assert!(store.location(&"loc-9".into()).is_some());
        assert!(store.location(&"loc-3".into()).is_some());
        assert!(store.revision() > rev);
    }

    #[test]
    fn test_remove_location_cascades() {
        let mut store = two_company_store();
        assert!(store.remove_location(&"loc-1".into()));
        assert!(store.device(&"dev-1a".into()).is_none());
        assert_eq!(store.devices().len(), 4);
        assert!(!store.remove_location(&"loc-1".into()));
    }

    #[test]
    fn test_unknown_names() {
        let store = two_company_store();
        assert_eq!(store.location_name(&"nowhere".into()), "Unknown");
        let ghost = DeviceId::from("ghost");
        assert_eq!(store.device_name(&ghost), "ghost");
    }
}
