//! Workspace - Application State and Event Pump
//!
//! The workspace owns every store (session, UI preferences, scope context,
//! reference data, per-feed load state) and is the only writer to them. The
//! embedder drives it synchronously: call the setters, then `pump()` to apply
//! fetch results that arrived from the service hub. Observers subscribe to
//! [`UiEvent`]s and re-read the workspace when one arrives.

use crate::app::guard::settle;
use crate::app::navigation::{VisibleGroup, nav_tree, visible_groups};
use crate::app::routes::Route;
use crate::auth::{AuthStatus, Credentials, Persona, SessionState};
use crate::constants::{PUMP_BATCH_SIZE, UI_EVENT_CAPACITY};
use crate::domain::{
    Alert, AlertId, AlertState, Catalog, CompanyId, DateRange, DeviceId, DeviceStatus, Diagnostics,
    FirmwareRelease, LocationId, Metrics, ReportId, StaffId,
};
use crate::error::Result;
use crate::features::business::{OverviewView, overview};
use crate::features::forms::{CompanyDraft, DeviceDraft, LocationDraft, ReportDraft, StaffDraft};
use crate::features::operations::transition_alert;
use crate::services::{
    AlertQuery, DataSource, Feed, FetchResult, FleetQuery, OverviewQuery, ServiceEvent, ServiceHub,
};
use crate::states::{
    ContextChange, ContextStore, LoadStatus, Loadable, PreferenceStore, Preferences, ReferenceStore,
    ScopeContext, ScopeKey, TableDensity, UiEvent, UiState, load_or_default, resolve,
    save_quietly,
};
use chrono::{Local, NaiveDate, Utc};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Main workspace holding all console state
pub struct Workspace<D: DataSource, P: PreferenceStore> {
    hub: ServiceHub<D>,
    service_rx: Receiver<ServiceEvent>,
    preferences: P,
    session: SessionState,
    ui: UiState,
    context: ContextStore,
    refs: ReferenceStore,
    route: Route,
    today: NaiveDate,
    /// Set while the resolver runs so its clears cannot schedule another run
    resolving: bool,
    catalog: Loadable<()>,
    overview: Loadable<Option<Metrics>>,
    fleet: Loadable<Vec<DeviceStatus>>,
    alerts: Loadable<Vec<Alert>>,
    diagnostics: Loadable<Diagnostics>,
    firmware: Loadable<Vec<FirmwareRelease>>,
    /// One bounded queue per observer; closed ones are pruned on the next emit
    subscribers: Vec<Sender<UiEvent>>,
}

impl<D: DataSource, P: PreferenceStore> Workspace<D, P> {
    /// Restore preferences and set the default date range. Nothing is fetched
    /// until [`Workspace::start`].
    pub fn new(source: D, preferences: P) -> Self {
        Self::with_hub(ServiceHub::new(source), preferences)
    }

    pub fn with_hub(hub: ServiceHub<D>, preferences: P) -> Self {
        let stored = load_or_default(&preferences);
        let today = Local::now().date_naive();
        let mut context = ContextStore::new();
        context.ensure_default_date_range(today);
        info!(
            persona = %stored.persona,
            authenticated = stored.status == AuthStatus::Authenticated,
            "Workspace restored"
        );
        Self {
            service_rx: hub.events(),
            hub,
            session: stored.session(),
            ui: stored.ui(),
            preferences,
            context,
            refs: ReferenceStore::new(),
            route: Route::Root,
            today,
            resolving: false,
            catalog: Loadable::default(),
            overview: Loadable::default(),
            fleet: Loadable::default(),
            alerts: Loadable::default(),
            diagnostics: Loadable::default(),
            firmware: Loadable::default(),
            subscribers: Vec::new(),
        }
    }

    /// Kick off the reference catalog load
    pub fn start(&mut self) {
        self.fetch(Feed::Catalog);
    }

    // ==================== Getters ====================

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    pub fn scope(&self) -> &ScopeContext {
        self.context.scope()
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    pub fn refs(&self) -> &ReferenceStore {
        &self.refs
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn hub(&self) -> &ServiceHub<D> {
        &self.hub
    }

    /// Sidebar groups for the current persona
    pub fn visible_nav(&self) -> Vec<VisibleGroup<'static>> {
        visible_groups(nav_tree(), self.session.capabilities())
    }

    pub fn catalog_state(&self) -> &Loadable<()> {
        &self.catalog
    }

    pub fn overview(&self) -> &Loadable<Option<Metrics>> {
        &self.overview
    }

    pub fn fleet(&self) -> &Loadable<Vec<DeviceStatus>> {
        &self.fleet
    }

    pub fn alerts(&self) -> &Loadable<Vec<Alert>> {
        &self.alerts
    }

    pub fn diagnostics(&self) -> &Loadable<Diagnostics> {
        &self.diagnostics
    }

    pub fn firmware(&self) -> &Loadable<Vec<FirmwareRelease>> {
        &self.firmware
    }

    /// Overview page model for the current metrics and range
    pub fn overview_view(&self) -> OverviewView {
        overview(
            self.overview.data().as_ref(),
            self.context.date_range().key_or_default(self.today),
        )
    }

    /// Register an observer. Every subscriber receives every event emitted after
    /// it subscribed. A subscriber that falls `UI_EVENT_CAPACITY` events behind
    /// misses the newer ones until it drains; dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<UiEvent> {
        let (tx, rx) = crossbeam_channel::bounded(UI_EVENT_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn emit(&mut self, event: UiEvent) {
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                trace!("UI event queue full, dropping event for one subscriber");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    // ==================== Session ====================

    fn persist(&self, action: &'static str) {
        let prefs = Preferences::capture(&self.session, &self.ui);
        save_quietly(&self.preferences, &prefs, action);
    }

    /// Validate the login form, sign in, and leave the login page if on it
    pub fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let user = credentials.validate()?;
        info!(email = %user.email, "Signed in");
        self.session.login(user);
        self.persist("login");
        self.emit(UiEvent::SessionChanged { authenticated: true });
        self.reguard();
        Ok(())
    }

    pub fn logout(&mut self) {
        let persona_changed = self.session.persona() != Persona::default();
        self.session.logout();
        self.persist("logout");
        info!("Signed out");
        self.emit(UiEvent::SessionChanged { authenticated: false });
        if persona_changed {
            self.emit(UiEvent::PersonaChanged {
                persona: self.session.persona(),
            });
        }
        self.reguard();
    }

    /// Switch persona. The capability set, navigation, and current route
    /// guard are all re-evaluated before this returns.
    pub fn set_persona(&mut self, persona: Persona) {
        if !self.session.set_persona(persona) {
            return;
        }
        info!(%persona, "Persona switched");
        self.persist("set_persona");
        self.emit(UiEvent::PersonaChanged { persona });
        self.reguard();
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        let collapsed = self.ui.toggle_sidebar();
        self.persist("toggle_sidebar");
        self.emit(UiEvent::PreferencesChanged);
        collapsed
    }

    pub fn set_table_density(&mut self, density: TableDensity) {
        if self.ui.set_table_density(density) {
            self.persist("set_table_density");
            self.emit(UiEvent::PreferencesChanged);
        }
    }

    // ==================== Scope ====================

    pub fn set_company(&mut self, id: Option<CompanyId>) {
        let change = self.context.set_company(id);
        self.after_context_write(change);
    }

    pub fn set_location(&mut self, id: Option<LocationId>) {
        let change = self.context.set_location(id);
        self.after_context_write(change);
    }

    pub fn set_device(&mut self, id: Option<DeviceId>) {
        let change = self.context.set_device(id);
        self.after_context_write(change);
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        let change = self.context.set_date_range(range);
        self.after_context_write(change);
    }

    fn run_resolver(&mut self) -> ContextChange {
        if self.resolving {
            return ContextChange::default();
        }
        self.resolving = true;
        let change = resolve(&mut self.context, &self.refs);
        self.resolving = false;
        change
    }

    /// Normalize, notify, and refetch the active page when the scope moved
    fn after_context_write(&mut self, change: ContextChange) {
        let change = change.merge(self.run_resolver());
        if !change.any() {
            return;
        }
        debug!(?change, scope = ?self.context.scope(), "Scope changed");
        self.emit(UiEvent::ContextChanged { change });
        self.refresh_active();
    }

    // ==================== Navigation ====================

    /// Navigate to `path`. Returns the route that actually renders after guard
    /// redirects.
    pub fn navigate(&mut self, path: &str) -> Route {
        let requested = Route::parse(path);
        let target = settle(
            self.session.status(),
            self.session.capabilities(),
            requested.clone(),
        );
        if target != requested {
            info!(requested = %requested, target = %target, "Navigation redirected");
            self.emit(UiEvent::Redirected {
                requested,
                target: target.clone(),
            });
        }
        self.enter(target.clone());
        target
    }

    fn enter(&mut self, route: Route) {
        self.route = route.clone();
        self.emit(UiEvent::Navigated { route });
        let change = self.pin_from_route();
        if change.any() {
            self.emit(UiEvent::ContextChanged { change });
        }
        self.refresh_active();
    }

    /// Re-check the current route after a session or persona change
    fn reguard(&mut self) {
        let target = settle(
            self.session.status(),
            self.session.capabilities(),
            self.route.clone(),
        );
        if target != self.route {
            info!(from = %self.route, to = %target, "Current page no longer allowed");
            self.emit(UiEvent::Redirected {
                requested: self.route.clone(),
                target: target.clone(),
            });
            self.enter(target);
        }
    }

    /// Detail routes pin the scope to their entity. Writes that would not change
    /// anything are skipped.
    fn pin_from_route(&mut self) -> ContextChange {
        let mut change = ContextChange::default();
        let route = self.route.clone();
        match &route {
            Route::BusinessCompany(id) => {
                if self.context.company_id() != Some(id) {
                    change = change.merge(self.context.set_company(Some(id.clone())));
                }
            }
            Route::BusinessDevice(raw) | Route::EngDevice(raw) => {
                let Some(device) = self.refs.find_device(raw) else {
                    return change.merge(self.run_resolver());
                };
                let device_id = device.id.clone();
                let location_id = device.location_id.clone();
                let company_id = self.refs.company_id_of_location(&location_id).cloned();
                if let Some(company_id) = company_id
                    && self.context.company_id() != Some(&company_id)
                {
                    change = change.merge(self.context.set_company(Some(company_id)));
                }
                if self.context.location_id() != Some(&location_id) {
                    change = change.merge(self.context.set_location(Some(location_id)));
                }
                if self.context.device_id() != Some(&device_id) {
                    change = change.merge(self.context.set_device(Some(device_id)));
                }
            }
            _ => {}
        }
        change.merge(self.run_resolver())
    }

    // ==================== Data ====================

    fn scope_key(&self) -> ScopeKey {
        self.context.scope().key(self.today)
    }

    fn loadable_begin(&mut self, feed: Feed, request_id: u64, key: ScopeKey) {
        match feed {
            Feed::Catalog => self.catalog.begin(request_id, key),
            Feed::Overview => self.overview.begin(request_id, key),
            Feed::Fleet => self.fleet.begin(request_id, key),
            Feed::Alerts => self.alerts.begin(request_id, key),
            Feed::Diagnostics => self.diagnostics.begin(request_id, key),
            Feed::Firmware => self.firmware.begin(request_id, key),
        }
    }

    /// Dispatch one feed for the current scope
    fn fetch(&mut self, feed: Feed) {
        let scope = self.context.scope().clone();
        let key = self.scope_key();
        let dispatched = match feed {
            Feed::Catalog => self.hub.fetch_catalog(),
            Feed::Overview => self.hub.fetch_overview(OverviewQuery {
                company_id: scope.company_id,
                date_range_key: key.range_key,
            }),
            Feed::Fleet => self.hub.fetch_fleet(FleetQuery {
                company_id: scope.company_id,
                location_id: scope.location_id,
                device_ids: scope.device_id.into_iter().collect(),
            }),
            Feed::Alerts => self.hub.fetch_alerts(AlertQuery {
                company_id: scope.company_id,
                location_id: scope.location_id,
                device_id: scope.device_id,
            }),
            Feed::Diagnostics => self.hub.fetch_diagnostics(scope.device_id),
            Feed::Firmware => self.hub.fetch_firmware(),
        };
        match dispatched {
            Ok(request_id) => {
                self.loadable_begin(feed, request_id, key);
                self.emit(UiEvent::ViewLoading { view: feed });
            }
            Err(e) => {
                warn!(%feed, error = %e, "Failed to dispatch fetch");
                self.emit(UiEvent::ViewFailed {
                    view: feed,
                    message: Arc::from(e.to_string()),
                });
            }
        }
    }

    /// Refetch the feeds the current page reads
    fn refresh_active(&mut self) {
        for feed in self.route.feeds() {
            self.fetch(*feed);
        }
    }

    /// Retry after a failure: the catalog if it failed, then the current page
    pub fn refetch(&mut self) {
        if self.catalog.status() == LoadStatus::Failed {
            self.fetch(Feed::Catalog);
        }
        self.refresh_active();
    }

    /// Whether any feed is waiting on a response
    pub fn is_loading(&self) -> bool {
        self.catalog.is_loading()
            || self.overview.is_loading()
            || self.fleet.is_loading()
            || self.alerts.is_loading()
            || self.diagnostics.is_loading()
            || self.firmware.is_loading()
    }

    /// Apply every fetch result that has arrived, up to one batch. Returns how
    /// many events were drained (stale ones included).
    pub fn pump(&mut self) -> usize {
        let mut drained = 0;
        while drained < PUMP_BATCH_SIZE {
            match self.service_rx.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    drained += 1;
                }
                Err(_) => break,
            }
        }
        drained
    }

    /// Block until nothing is loading or `timeout` passes. Returns true when idle.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if !self.is_loading() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.service_rx.recv_timeout(remaining) {
                Ok(event) => self.apply(event),
                Err(RecvTimeoutError::Timeout) => return !self.is_loading(),
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn apply(&mut self, event: ServiceEvent) {
        let feed = event.feed();
        let request_id = event.request_id();
        let (applied, error) = match event {
            ServiceEvent::Catalog { request_id, result } => self.apply_catalog(request_id, result),
            ServiceEvent::Overview { request_id, result } => {
                settle_feed(&mut self.overview, request_id, result)
            }
            ServiceEvent::Fleet { request_id, result } => {
                settle_feed(&mut self.fleet, request_id, result)
            }
            ServiceEvent::Alerts { request_id, result } => {
                settle_feed(&mut self.alerts, request_id, result)
            }
            ServiceEvent::Diagnostics { request_id, result } => {
                settle_feed(&mut self.diagnostics, request_id, result)
            }
            ServiceEvent::Firmware { request_id, result } => {
                settle_feed(&mut self.firmware, request_id, result)
            }
        };
        if !applied {
            debug!(%feed, request_id, "Discarding stale response");
            return;
        }
        match error {
            Some(message) => {
                warn!(%feed, %message, "Load failed");
                self.emit(UiEvent::ViewFailed { view: feed, message });
            }
            None => self.emit(UiEvent::ViewLoaded { view: feed }),
        }
    }

    fn apply_catalog(
        &mut self,
        request_id: u64,
        result: FetchResult<Catalog>,
    ) -> (bool, Option<Arc<str>>) {
        if !self.catalog.is_pending(request_id) {
            return (false, None);
        }
        match result {
            Ok(catalog) => {
                self.catalog.complete(request_id, Ok(()));
                self.refs.replace(catalog);
                self.emit(UiEvent::CatalogChanged {
                    revision: self.refs.revision(),
                });
                // Detail routes entered before the catalog arrived pin now
                let change = self.pin_from_route();
                if change.any() {
                    self.emit(UiEvent::ContextChanged { change });
                    self.refresh_active();
                }
                (true, None)
            }
            Err(message) => {
                self.catalog.complete(request_id, Err(message.to_string()));
                (true, Some(message))
            }
        }
    }

    // ==================== Mutations ====================

    fn after_catalog_mutation(&mut self) {
        self.emit(UiEvent::CatalogChanged {
            revision: self.refs.revision(),
        });
        self.after_context_write(ContextChange::default());
    }

    pub fn add_company(&mut self, draft: &CompanyDraft) -> Result<CompanyId> {
        let company = draft.build(&self.refs, Utc::now())?;
        let id = company.id.clone();
        info!(company = %id, "Company added");
        self.refs.add_company(company);
        self.after_catalog_mutation();
        Ok(id)
    }

    pub fn add_location(&mut self, draft: &LocationDraft) -> Result<LocationId> {
        let location = draft.build(&self.refs, Utc::now())?;
        let id = location.id.clone();
        info!(location = %id, "Location added");
        self.refs.add_location(location);
        self.after_catalog_mutation();
        Ok(id)
    }

    pub fn add_device(&mut self, draft: &DeviceDraft) -> Result<DeviceId> {
        let device = draft.build(&self.refs, Utc::now())?;
        let id = device.id.clone();
        info!(device = %id, "Device added");
        self.refs.add_device(device);
        self.after_catalog_mutation();
        Ok(id)
    }

    pub fn add_staff(&mut self, draft: &StaffDraft) -> Result<StaffId> {
        let staff = draft.build(&self.refs, Utc::now())?;
        let id = staff.id.clone();
        info!(staff = %id, "Staff member added");
        self.refs.add_staff(staff);
        self.after_catalog_mutation();
        Ok(id)
    }

    pub fn add_report(&mut self, draft: &ReportDraft) -> Result<ReportId> {
        let report = draft.build(&self.refs, Utc::now())?;
        let id = report.id.clone();
        info!(report = %id, "Report added");
        self.refs.add_report(report);
        self.after_catalog_mutation();
        Ok(id)
    }

    /// Remove a location with its devices, staff, and reports
    pub fn remove_location(&mut self, id: &LocationId) -> bool {
        let removed = self.refs.remove_location(id);
        if removed {
            info!(location = %id, "Location removed");
            self.after_catalog_mutation();
        }
        removed
    }

    pub fn remove_device(&mut self, id: &DeviceId) -> bool {
        let removed = self.refs.remove_device(id);
        if removed {
            info!(device = %id, "Device removed");
            self.after_catalog_mutation();
        }
        removed
    }

    fn triage(&mut self, id: &AlertId, target: AlertState) -> Result<()> {
        transition_alert(self.alerts.data_mut(), id, target, Utc::now())?;
        self.emit(UiEvent::Toast {
            message: Arc::from(format!("Alert {} marked {}", id, target.label())),
            is_error: false,
        });
        Ok(())
    }

    pub fn acknowledge_alert(&mut self, id: &AlertId) -> Result<()> {
        self.triage(id, AlertState::Ack)
    }

    pub fn resolve_alert(&mut self, id: &AlertId) -> Result<()> {
        self.triage(id, AlertState::Resolved)
    }
}

/// Complete a feed's loadable; returns (applied, error message)
fn settle_feed<T>(
    loadable: &mut Loadable<T>,
    request_id: u64,
    result: FetchResult<T>,
) -> (bool, Option<Arc<str>>) {
    let error = result.as_ref().err().cloned();
    let applied = loadable.complete(request_id, result.map_err(|m| m.to_string()));
    (applied, error)
}

impl<D: DataSource, P: PreferenceStore> std::fmt::Debug for Workspace<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("route", &self.route)
            .field("persona", &self.session.persona())
            .field("scope", self.context.scope())
            .field("revision", &self.refs.revision())
            .finish()
    }
}
