//! Route Table
//!
//! Every path the console can show, parsed from and formatted back to URL paths.

use crate::auth::Capability;
use crate::domain::CompanyId;
use crate::services::Feed;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    /// `/`, always redirected
    Root,
    BusinessOverview,
    BusinessCompanies,
    BusinessCompany(CompanyId),
    BusinessDevices,
    /// Device id or device name, as typed in the URL
    BusinessDevice(String),
    BusinessLocations,
    BusinessStaff,
    BusinessReports,
    OpsFleet,
    OpsAlerts,
    OpsLocations,
    EngDevices,
    EngDevice(String),
    EngFirmware,
    Profile,
    NotFound(String),
}

impl Route {
    /// Parse a path; query strings, fragments, and trailing slashes are ignored
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["profile"] => Route::Profile,
            ["business", "overview"] => Route::BusinessOverview,
            ["business", "companies"] => Route::BusinessCompanies,
            ["business", "companies", id] => Route::BusinessCompany(CompanyId::from(*id)),
            ["business", "devices"] => Route::BusinessDevices,
            ["business", "devices", id] => Route::BusinessDevice(id.to_string()),
            ["business", "locations"] => Route::BusinessLocations,
            ["business", "staff"] => Route::BusinessStaff,
            ["business", "reports"] => Route::BusinessReports,
            ["ops", "fleet"] => Route::OpsFleet,
            ["ops", "alerts"] => Route::OpsAlerts,
            ["ops", "locations"] => Route::OpsLocations,
            ["eng", "devices"] => Route::EngDevices,
            ["eng", "devices", id] => Route::EngDevice(id.to_string()),
            ["eng", "firmware"] => Route::EngFirmware,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Root => "/".to_string(),
            Route::BusinessOverview => "/business/overview".to_string(),
            Route::BusinessCompanies => "/business/companies".to_string(),
            Route::BusinessCompany(id) => format!("/business/companies/{id}"),
            Route::BusinessDevices => "/business/devices".to_string(),
            Route::BusinessDevice(id) => format!("/business/devices/{id}"),
            Route::BusinessLocations => "/business/locations".to_string(),
            Route::BusinessStaff => "/business/staff".to_string(),
            Route::BusinessReports => "/business/reports".to_string(),
            Route::OpsFleet => "/ops/fleet".to_string(),
            Route::OpsAlerts => "/ops/alerts".to_string(),
            Route::OpsLocations => "/ops/locations".to_string(),
            Route::EngDevices => "/eng/devices".to_string(),
            Route::EngDevice(id) => format!("/eng/devices/{id}"),
            Route::EngFirmware => "/eng/firmware".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Capability a route declares, if any
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Route::EngDevices | Route::EngDevice(_) | Route::EngFirmware => {
                Some(Capability::CanViewEng)
            }
            _ => None,
        }
    }

    /// Everything but the login page needs a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Data feeds the page reads besides the reference catalog
    pub fn feeds(&self) -> &'static [Feed] {
        match self {
            Route::BusinessOverview => &[Feed::Overview],
            Route::BusinessCompany(_) => &[Feed::Alerts],
            Route::BusinessDevices | Route::BusinessDevice(_) | Route::OpsFleet => &[Feed::Fleet],
            Route::OpsAlerts => &[Feed::Alerts],
            Route::OpsLocations => &[Feed::Fleet, Feed::Alerts],
            Route::EngDevices => &[Feed::Fleet, Feed::Alerts, Feed::Firmware],
            Route::EngDevice(_) => &[Feed::Diagnostics],
            Route::EngFirmware => &[Feed::Firmware],
            _ => &[],
        }
    }

    /// Page title shown in the header
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Root | Route::BusinessOverview => "Overview",
            Route::BusinessCompanies => "Companies",
            Route::BusinessCompany(_) => "Company",
            Route::BusinessDevices | Route::EngDevices => "Devices",
            Route::BusinessDevice(_) | Route::EngDevice(_) => "Device",
            Route::BusinessLocations | Route::OpsLocations => "Locations",
            Route::BusinessStaff => "Staff",
            Route::BusinessReports => "Reports",
            Route::OpsFleet => "Fleet",
            Route::OpsAlerts => "Alerts",
            Route::EngFirmware => "Firmware",
            Route::Profile => "Profile",
            Route::NotFound(_) => "Not found",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_known_paths() {
        for path in [
            "/login",
            "/business/overview",
            "/business/companies",
            "/business/companies/co-acme",
            "/business/devices",
            "/business/devices/dev-1",
            "/business/locations",
            "/business/staff",
            "/business/reports",
            "/ops/fleet",
            "/ops/alerts",
            "/ops/locations",
            "/eng/devices",
            "/eng/devices/dev-1",
            "/eng/firmware",
            "/profile",
        ] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn test_parse_tolerates_noise() {
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse("/ops/fleet/"), Route::OpsFleet);
        assert_eq!(Route::parse("/ops/alerts?x=1#top"), Route::OpsAlerts);
    }

    #[test]
    fn test_unknown_path() {
        let route = Route::parse("/nowhere/else");
        assert_eq!(route, Route::NotFound("/nowhere/else".into()));
        assert!(route.is_protected());
        assert_eq!(route.required_capability(), None);
    }

    #[test]
    fn test_feeds_per_page() {
        assert_eq!(Route::BusinessOverview.feeds(), &[Feed::Overview]);
        assert!(Route::BusinessStaff.feeds().is_empty());
        assert_eq!(Route::EngDevice("x".into()).feeds(), &[Feed::Diagnostics]);
    }

    #[test]
    fn test_only_engineering_is_gated() {
        assert_eq!(
            Route::EngFirmware.required_capability(),
            Some(Capability::CanViewEng)
        );
        assert_eq!(Route::OpsFleet.required_capability(), None);
        assert!(!Route::Login.is_protected());
    }
}
