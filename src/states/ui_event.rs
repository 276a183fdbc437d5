//! UI Events
//!
//! Events emitted from the state layer to whatever renders it. Delivered over a
//! crossbeam channel; receivers re-read the workspace on each event.

use crate::app::routes::Route;
use crate::services::Feed;
use crate::auth::Persona;
use crate::states::context::ContextChange;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum UiEvent {
    /// Scope selection changed (after cascading)
    ContextChanged { change: ContextChange },

    /// Persona switched; capability set and navigation already recomputed
    PersonaChanged { persona: Persona },

    /// Logged in or out
    SessionChanged { authenticated: bool },

    /// Sidebar or density changed
    PreferencesChanged,

    /// Reference catalog changed (new entity, reload)
    CatalogChanged { revision: u64 },

    /// Active route changed
    Navigated { route: Route },

    /// A guarded navigation was redirected
    Redirected { requested: Route, target: Route },

    /// A view started loading
    ViewLoading { view: Feed },

    /// A view finished loading
    ViewLoaded { view: Feed },

    /// A view failed to load; refetch to retry
    ViewFailed { view: Feed, message: Arc<str> },

    /// Display a toast notification
    Toast {
        /// Message to display
        message: Arc<str>,
        /// Whether this is an error (affects styling)
        is_error: bool,
    },
}
