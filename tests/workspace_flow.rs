//! End-to-end workspace flows against the bundled mock data.

use fleet_console::app::{Route, Workspace};
use fleet_console::auth::{Credentials, Persona};
use fleet_console::domain::{CompanyId, DateRangeKey};
use fleet_console::features::PageFilters;
use fleet_console::features::business::device_rows;
use fleet_console::features::operations::{StatusFilter, fleet_rows};
use fleet_console::services::{Latency, MockData, MockDataSource};
use fleet_console::states::{
    FilePreferenceStore, LoadStatus, MemoryPreferenceStore, PreferenceStore, UiEvent,
};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn source(latency: Latency) -> MockDataSource {
    MockDataSource::embedded()
        .expect("fixtures parse")
        .with_latency(latency)
}

fn booted<P: PreferenceStore>(preferences: P) -> Workspace<MockDataSource, P> {
    let mut ws = Workspace::new(source(Latency::none()), preferences);
    ws.start();
    assert!(ws.pump_until_idle(WAIT), "catalog load timed out");
    ws
}

fn signed_in(persona: Persona) -> Workspace<MockDataSource, MemoryPreferenceStore> {
    let mut ws = booted(MemoryPreferenceStore::new());
    ws.login(&Credentials::new("ops@fleet.example", "secret"))
        .expect("valid credentials");
    ws.set_persona(persona);
    ws
}

fn company(ws: &Workspace<MockDataSource, impl PreferenceStore>, index: usize) -> CompanyId {
    ws.refs().companies()[index].id.clone()
}

fn nav_labels(ws: &Workspace<MockDataSource, impl PreferenceStore>) -> Vec<&'static str> {
    ws.visible_nav().iter().map(|g| g.label).collect()
}

#[test]
fn unauthenticated_engineering_visit_goes_to_login() {
    let mut ws = booted(MemoryPreferenceStore::new());
    assert_eq!(ws.navigate("/eng/devices"), Route::Login);
    assert_eq!(ws.navigate("/"), Route::Login);
}

#[test]
fn customer_admin_is_bounced_from_engineering() {
    let mut ws = signed_in(Persona::CustomerAdmin);
    let events = ws.subscribe();
    while events.try_recv().is_ok() {}

    assert_eq!(ws.navigate("/eng/devices"), Route::BusinessOverview);
    let redirected = events.try_iter().any(|e| {
        matches!(
            e,
            UiEvent::Redirected {
                requested: Route::EngDevices,
                target: Route::BusinessOverview
            }
        )
    });
    assert!(redirected);
}

#[test]
fn engineer_reaches_engineering_pages() {
    let mut ws = signed_in(Persona::Engineer);
    assert_eq!(ws.navigate("/eng/devices"), Route::EngDevices);
    assert_eq!(ws.navigate("/eng/firmware"), Route::EngFirmware);
    assert!(ws.pump_until_idle(WAIT));
    assert_eq!(ws.firmware().status(), LoadStatus::Succeeded);
    assert!(!ws.firmware().data().is_empty());
}

#[test]
fn navigation_follows_persona() {
    let mut ws = signed_in(Persona::CustomerAdmin);
    assert_eq!(nav_labels(&ws), ["Business", "Operations", "Account"]);
    ws.set_persona(Persona::Engineer);
    assert_eq!(
        nav_labels(&ws),
        ["Business", "Operations", "Engineering", "Account"]
    );
    ws.set_persona(Persona::InternalOps);
    assert_eq!(nav_labels(&ws), ["Business", "Operations", "Account"]);
}

#[test]
fn cross_company_location_is_cleared() {
    let mut ws = signed_in(Persona::CustomerAdmin);
    let first = company(&ws, 0);
    let foreign = ws
        .refs()
        .locations()
        .iter()
        .find(|l| l.company_id != first)
        .map(|l| l.id.clone())
        .expect("a location of another company");

    ws.set_company(Some(first.clone()));
    ws.set_location(Some(foreign));
    assert_eq!(ws.context().company_id(), Some(&first));
    assert_eq!(ws.context().location_id(), None);
    assert_eq!(ws.context().device_id(), None);
}

#[test]
fn latest_scope_wins_over_earlier_response() {
    let companies = MockData::embedded()
        .expect("fixtures parse")
        .catalog
        .companies;
    let (first, second) = (companies[0].id.clone(), companies[1].id.clone());
    let slow = source(Latency::none()).with_slow_company(first.clone(), Duration::from_millis(300));
    let mut ws = Workspace::new(slow, MemoryPreferenceStore::new());
    ws.start();
    assert!(ws.pump_until_idle(WAIT));
    ws.login(&Credentials::new("a@b.co", "pw")).expect("valid");
    ws.navigate("/business/overview");

    ws.set_company(Some(first));
    ws.set_company(Some(second.clone()));
    assert!(ws.pump_until_idle(WAIT));
    assert_eq!(
        ws.overview().data().as_ref().map(|m| &m.company_id),
        Some(&second)
    );

    // The first company's response lands after the second one was applied
    std::thread::sleep(Duration::from_millis(500));
    assert!(ws.pump() >= 1);
    let metrics = ws.overview().data().as_ref().expect("metrics for the company");
    assert_eq!(metrics.company_id, second);
    assert_eq!(metrics.date_range_key, DateRangeKey::Last7);
    assert_eq!(ws.overview().status(), LoadStatus::Succeeded);
    assert_eq!(ws.overview_view().kpis.len(), 4);
}

#[test]
fn failed_load_recovers_on_refetch() {
    let mut ws = signed_in(Persona::CustomerAdmin);
    ws.hub().source().set_failing(true);
    ws.navigate("/ops/fleet");
    assert!(ws.pump_until_idle(WAIT));
    assert_eq!(ws.fleet().status(), LoadStatus::Failed);
    assert!(ws.fleet().error().is_some());

    ws.hub().source().set_failing(false);
    ws.refetch();
    assert!(ws.pump_until_idle(WAIT));
    assert_eq!(ws.fleet().status(), LoadStatus::Succeeded);
    let rows = fleet_rows(ws.refs(), ws.fleet().data(), StatusFilter::All);
    assert_eq!(rows.len(), ws.refs().devices().len());
}

#[test]
fn business_device_route_pins_scope() {
    let mut ws = signed_in(Persona::CustomerAdmin);
    let device = ws.refs().devices()[2].clone();
    ws.navigate(&format!("/business/devices/{}", device.id));
    assert_eq!(ws.context().device_id(), Some(&device.id));
    assert!(ws.pump_until_idle(WAIT));

    let filters = PageFilters::seeded(ws.scope(), ws.refs());
    let rows = device_rows(ws.refs(), &filters, ws.fleet().data());
    assert!(rows.iter().all(|r| r.location_name == rows[0].location_name));
    assert!(rows.iter().any(|r| r.id == device.id && r.status.is_some()));
}

#[test]
fn preferences_survive_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fleet-console.toml");
    {
        let mut ws = booted(FilePreferenceStore::at(&path));
        ws.login(&Credentials::new("eng@fleet.example", "pw")).expect("valid");
        ws.set_persona(Persona::Engineer);
        assert!(ws.toggle_sidebar());
    }
    let ws = booted(FilePreferenceStore::at(&path));
    assert!(ws.session().is_authenticated());
    assert_eq!(ws.session().persona(), Persona::Engineer);
    assert!(ws.ui().sidebar_collapsed);
    assert_eq!(
        ws.session().user().map(|u| u.email.as_str()),
        Some("eng@fleet.example")
    );
}

#[test]
fn corrupt_preferences_fall_back_to_defaults() {
    let ws = booted(MemoryPreferenceStore::with_raw("persona = [not toml"));
    assert!(!ws.session().is_authenticated());
    assert_eq!(ws.session().persona(), Persona::CustomerAdmin);
}

#[test]
fn logout_returns_to_login() {
    let mut ws = signed_in(Persona::Engineer);
    ws.navigate("/eng/devices");
    ws.logout();
    assert_eq!(ws.route(), &Route::Login);
    assert_eq!(ws.session().persona(), Persona::CustomerAdmin);
}
